//! Wattcheck - static energy-complexity analysis.
//!
//! Wattcheck estimates a program's energy cost from source code alone. It
//! extracts structural features from a parsed syntax tree, assigns a
//! heuristic Big-O label with a bounded 0-100 score, and runs a trained
//! bagged-tree regressor that maps the same features to an estimated energy
//! value with an agreement-based confidence.
//!
//! # Architecture
//!
//! - `analysis`: tree-sitter feature extraction and the complexity classifier
//! - `model`: bagged regression-tree ensemble, training, and persistence
//! - `dataset`: training-sample records and their binary persistence
//! - `report`: serializable result structures for presentation layers
//! - `error`: the crate-wide error taxonomy
//!
//! # Example
//!
//! ```
//! let report = wattcheck::analyze("for i in range(10):\n    total = i\n").unwrap();
//! assert_eq!(report.big_o.label(), "O(n)");
//! ```
//!
//! Prediction requires a model trained from `(features, energy)` pairs
//! supplied by an external measurement harness:
//!
//! ```no_run
//! use std::path::Path;
//! use wattcheck::model::{ForestConfig, Predictor};
//!
//! let mut predictor = Predictor::new();
//! let samples = wattcheck::dataset::load(Path::new("data/training.bin")).unwrap();
//! predictor.train(&samples, &ForestConfig::default()).unwrap();
//!
//! let report = wattcheck::analyze("data.sort()\n").unwrap();
//! let prediction = predictor.predict(&report.features).unwrap();
//! println!("{} J (confidence {:.2})", prediction.energy_joules, prediction.confidence);
//! ```

pub mod analysis;
pub mod dataset;
pub mod error;
pub mod model;
pub mod report;

pub use analysis::{
    analyze, classify, BigO, ComplexityResult, FeatureExtractor, FeatureVector, FEATURE_NAMES,
};
pub use dataset::TrainingSample;
pub use error::{Error, Result};
pub use model::{ForestConfig, PredictionResult, Predictor, TrainedModel, TrainingMetrics};
pub use report::AnalysisReport;
