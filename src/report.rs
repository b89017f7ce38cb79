//! Serializable result structures for presentation layers.
//!
//! The analysis core defines only the structure and semantics of these
//! values; rendering (tables, colors, CLI output) lives with the consumer.

use serde::{Deserialize, Serialize};

use crate::analysis::{BigO, ComplexityResult, FeatureVector};
use crate::model::PredictionResult;

/// The combined analysis output for one source unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Extracted structural features.
    pub features: FeatureVector,
    /// Heuristic asymptotic-growth label.
    pub big_o: BigO,
    /// Heuristic energy-impact score in [0, 100].
    pub complexity_score: f64,
    /// Model-estimated energy, when a trained model was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<PredictionResult>,
}

impl AnalysisReport {
    pub fn new(features: FeatureVector, complexity: ComplexityResult) -> Self {
        Self {
            features,
            big_o: complexity.big_o,
            complexity_score: complexity.complexity_score,
            prediction: None,
        }
    }

    /// Attach a model prediction to the report.
    pub fn with_prediction(mut self, prediction: PredictionResult) -> Self {
        self.prediction = Some(prediction);
        self
    }

    /// Render as a JSON document with stable field names.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
