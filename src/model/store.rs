//! Binary model persistence.
//!
//! The fitted ensemble and its canonical feature-name list round-trip as one
//! bincode unit, prefixed with a format version. Loading verifies the stored
//! name list against the current extractor schema: a skew means the model
//! was trained under a different feature set and must be retrained, never
//! silently truncated or zero-filled.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::FEATURE_NAMES;
use crate::error::{Error, Result};
use crate::model::forest::Forest;
use crate::model::TrainedModel;

/// Bump when the persisted layout changes incompatibly.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StoredModel {
    format_version: u32,
    feature_names: Vec<String>,
    forest: Forest,
}

/// Persist a trained model at `path`, creating parent directories as needed.
pub fn save(model: &TrainedModel, path: &Path) -> Result<()> {
    let stored = StoredModel {
        format_version: MODEL_FORMAT_VERSION,
        feature_names: model.feature_names.clone(),
        forest: model.forest.clone(),
    };

    let bytes = bincode::serialize(&stored).map_err(|e| Error::ModelLoad {
        path: path.display().to_string(),
        reason: format!("serialization failed: {e}"),
    })?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    log::info!("model saved to {}", path.display());
    Ok(())
}

/// Load a trained model from `path`.
///
/// Fails with `Error::ModelLoad` for a missing/corrupt file and
/// `Error::MissingFeature` when the persisted feature schema disagrees with
/// the current extractor's dimension set.
pub fn load(path: &Path) -> Result<TrainedModel> {
    let bytes = fs::read(path).map_err(|e| Error::ModelLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let stored: StoredModel = bincode::deserialize(&bytes).map_err(|e| Error::ModelLoad {
        path: path.display().to_string(),
        reason: format!("corrupt model file: {e}"),
    })?;

    if stored.format_version != MODEL_FORMAT_VERSION {
        return Err(Error::ModelLoad {
            path: path.display().to_string(),
            reason: format!(
                "unsupported model format version {} (expected {})",
                stored.format_version, MODEL_FORMAT_VERSION
            ),
        });
    }

    verify_schema(&stored.feature_names)?;

    log::info!("model loaded from {}", path.display());
    Ok(TrainedModel {
        forest: stored.forest,
        feature_names: stored.feature_names,
    })
}

/// Check a persisted feature-name list against the current schema.
fn verify_schema(stored: &[String]) -> Result<()> {
    if stored.len() != FEATURE_NAMES.len() {
        let name = FEATURE_NAMES
            .iter()
            .find(|name| !stored.iter().any(|s| s == *name))
            .copied()
            .unwrap_or("feature count mismatch");
        return Err(Error::MissingFeature {
            name: name.to_string(),
        });
    }
    for (stored_name, expected) in stored.iter().zip(FEATURE_NAMES) {
        if stored_name != expected {
            return Err(Error::MissingFeature {
                name: expected.to_string(),
            });
        }
    }
    Ok(())
}
