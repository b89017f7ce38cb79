//! Training-sample records and dataset persistence.
//!
//! Samples arrive from an external data generator that synthesizes small
//! code snippets of known shapes and measures their energy; this crate only
//! defines the record shape and the binary persistence of the sequence.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{BigO, FeatureVector};
use crate::error::{Error, Result};

/// Bump when the persisted layout changes incompatibly.
pub const DATASET_FORMAT_VERSION: u32 = 1;

/// One labeled training sample: structural features paired with a measured
/// energy value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub features: FeatureVector,
    /// Measured energy in joules.
    pub energy_joules: f64,
    /// Heuristic complexity label at measurement time.
    pub big_o: BigO,
    /// Generator snippet-template tag (e.g. "nested_loop", "sorting"), when
    /// the sample came from the synthetic generator.
    pub code_shape: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct StoredDataset {
    format_version: u32,
    samples: Vec<TrainingSample>,
}

/// Persist a sample sequence at `path`, creating parent directories as
/// needed.
pub fn save(samples: &[TrainingSample], path: &Path) -> Result<()> {
    let stored = StoredDataset {
        format_version: DATASET_FORMAT_VERSION,
        samples: samples.to_vec(),
    };
    let bytes = bincode::serialize(&stored).map_err(|e| Error::Dataset {
        reason: format!("serialization failed: {e}"),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    log::info!("dataset of {} samples saved to {}", samples.len(), path.display());
    Ok(())
}

/// Load a sample sequence from `path`.
pub fn load(path: &Path) -> Result<Vec<TrainingSample>> {
    let bytes = fs::read(path)?;
    let stored: StoredDataset = bincode::deserialize(&bytes).map_err(|e| Error::Dataset {
        reason: format!("corrupt dataset file: {e}"),
    })?;

    if stored.format_version != DATASET_FORMAT_VERSION {
        return Err(Error::Dataset {
            reason: format!(
                "unsupported dataset format version {} (expected {})",
                stored.format_version, DATASET_FORMAT_VERSION
            ),
        });
    }

    log::info!("loaded {} samples from {}", stored.samples.len(), path.display());
    Ok(stored.samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> TrainingSample {
        TrainingSample {
            features: FeatureVector {
                num_loops: 2,
                max_loop_depth: 2,
                nested_loops: true,
                ..Default::default()
            },
            energy_joules: 14.25,
            big_o: BigO::Quadratic,
            code_shape: Some("nested_loop".to_string()),
        }
    }

    #[test]
    fn test_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data").join("training.bin");

        let samples = vec![sample(), sample()];
        save(&samples, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded, samples);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/training.bin")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_load_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("training.bin");
        fs::write(&path, b"not a dataset").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, Error::Dataset { .. }));
    }
}
