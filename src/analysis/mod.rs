//! Static structural analysis of Python source.
//!
//! The pipeline walks a tree-sitter parse tree once and produces a
//! fixed-schema feature vector, which feeds both the heuristic Big-O
//! classifier and the energy regressor:
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌────────────────┐
//! │ Source text │────▶│ FeatureExtractor │────▶│ FeatureVector  │
//! └─────────────┘     └──────────────────┘     └────────────────┘
//!                                                │            │
//!                                                ▼            ▼
//!                                       ┌────────────┐  ┌───────────┐
//!                                       │ classify() │  │ Predictor │
//!                                       └────────────┘  └───────────┘
//! ```
//!
//! Extraction and classification are pure functions, safe to invoke
//! concurrently on independent inputs with no coordination.

mod complexity;
mod extract;
mod features;
mod nodes;
mod source;

pub use complexity::{classify, weights, BigO, ComplexityResult, MAX_SCORE};
pub use extract::{extract_from_tree, FeatureExtractor};
pub use features::{FeatureVector, FEATURE_NAMES};
pub use nodes::NodeClass;
pub use source::{ParsedSource, PythonParser};

use crate::error::Result;
use crate::report::AnalysisReport;

/// Analyze one source unit: extract features and classify complexity.
///
/// Prediction is a separate step because it needs a trained model; see
/// [`crate::model::Predictor`] and [`AnalysisReport::with_prediction`].
pub fn analyze(source: &str) -> Result<AnalysisReport> {
    let features = FeatureExtractor::new().extract(source)?;
    let complexity = classify(&features);
    Ok(AnalysisReport::new(features, complexity))
}
