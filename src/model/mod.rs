//! Supervised energy regression.
//!
//! A bagged ensemble of regression trees maps the structural feature vector
//! to an estimated energy value and an agreement-based confidence. A bagged
//! ensemble is used instead of a linear model because code-energy
//! relationships have threshold effects (recursion presence dominates
//! regardless of loop count) that trees capture without extra feature
//! engineering.
//!
//! The loaded model is an explicitly passed, owned value: callers hold a
//! [`Predictor`] and inject it where predictions are needed. A model is
//! immutable once trained or loaded, so concurrent predictions against one
//! model are safe; re-training replaces it wholesale.

mod forest;
mod store;
mod train;
mod tree;

pub use forest::{Forest, ForestConfig};
pub use store::{load, save, MODEL_FORMAT_VERSION};
pub use train::{prepare_training_matrix, train, TrainingMatrix, TrainingMetrics};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::FeatureVector;
use crate::dataset::TrainingSample;
use crate::error::{Error, Result};

/// Guard against division by zero when the ensemble mean is near zero.
const CONFIDENCE_EPSILON: f64 = 1e-6;

/// One prediction: estimated energy and ensemble agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Estimated energy in joules; never negative.
    pub energy_joules: f64,
    /// Inverse-normalized spread of the per-tree predictions, clamped to
    /// [0, 1]. An agreement heuristic, not a calibrated probability.
    pub confidence: f64,
}

/// A fitted ensemble plus the canonical ordered feature-name list it was
/// trained against. Created by [`train`], persisted by [`save`], loaded
/// read-only by [`load`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    pub(crate) forest: Forest,
    pub(crate) feature_names: Vec<String>,
}

impl TrainedModel {
    /// The ordered dimension names prediction inputs must supply.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Predict energy for one feature vector.
    ///
    /// Fails with `Error::MissingFeature` if the vector does not supply
    /// every dimension in [`Self::feature_names`].
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let row = features.to_row(&self.feature_names)?;
        let per_tree = self.forest.predict_each(&row);

        let mean = per_tree.iter().sum::<f64>() / per_tree.len() as f64;
        let variance = per_tree
            .iter()
            .map(|p| (p - mean).powi(2))
            .sum::<f64>()
            / per_tree.len() as f64;
        let std_dev = variance.sqrt();

        let confidence = (1.0 - std_dev / (mean + CONFIDENCE_EPSILON)).clamp(0.0, 1.0);

        Ok(PredictionResult {
            energy_joules: mean.max(0.0),
            confidence,
        })
    }
}

/// Owns the current trained model and exposes the train/load/save/predict
/// lifecycle. Replaces ambient global model state with an injected value.
#[derive(Debug, Default)]
pub struct Predictor {
    model: Option<TrainedModel>,
}

impl Predictor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-trained model.
    pub fn from_model(model: TrainedModel) -> Self {
        Self { model: Some(model) }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_ref()
    }

    /// Prepare the training matrix, fit the ensemble, and keep the resulting
    /// model. Returns the evaluation metrics.
    pub fn train(
        &mut self,
        samples: &[TrainingSample],
        config: &ForestConfig,
    ) -> Result<TrainingMetrics> {
        let matrix = prepare_training_matrix(samples)?;
        let (model, metrics) = train(&matrix, config)?;
        self.model = Some(model);
        Ok(metrics)
    }

    /// Load a persisted model, replacing any currently held one.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.model = Some(store::load(path)?);
        Ok(())
    }

    /// Persist the current model.
    pub fn save(&self, path: &Path) -> Result<()> {
        let model = self.model.as_ref().ok_or(Error::ModelNotTrained)?;
        store::save(model, path)
    }

    /// Predict energy for one feature vector.
    ///
    /// Fails with `Error::ModelNotTrained` until a model has been trained or
    /// loaded in this session.
    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        let model = self.model.as_ref().ok_or(Error::ModelNotTrained)?;
        model.predict(features)
    }
}
