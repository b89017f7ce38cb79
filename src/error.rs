//! Error taxonomy for the analysis and prediction pipeline.
//!
//! All failures are synchronous and surfaced directly to the caller; nothing
//! is retried internally. The one place partial failure is tolerated is
//! training-matrix preparation, which skips malformed samples instead of
//! returning an error (see `model::train`).

use thiserror::Error;

/// Errors that can occur during analysis, training, prediction, or
/// persistence.
#[derive(Error, Debug)]
pub enum Error {
    /// The source text is not syntactically valid Python.
    #[error("invalid Python source: {message}")]
    Parse { message: String },

    /// Training was invoked with zero usable samples.
    #[error("training dataset contains no usable samples")]
    EmptyDataset,

    /// Prediction was attempted before a model was trained or loaded.
    #[error("no model trained or loaded; run training first")]
    ModelNotTrained,

    /// A feature vector or persisted model schema is missing a canonical
    /// dimension. Signals training-time/prediction-time schema skew and is
    /// never papered over by truncating or zero-filling.
    #[error("missing canonical feature dimension: {name}")]
    MissingFeature { name: String },

    /// The persisted model file is missing, corrupt, or unreadable.
    /// Recovery: run training first.
    #[error("failed to load model from {path}: {reason}")]
    ModelLoad { path: String, reason: String },

    /// The persisted dataset file could not be decoded.
    #[error("corrupt dataset file: {reason}")]
    Dataset { reason: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
