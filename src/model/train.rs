//! Training-matrix preparation, train/test split, and evaluation metrics.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::analysis::FEATURE_NAMES;
use crate::dataset::TrainingSample;
use crate::error::{Error, Result};
use crate::model::forest::{Forest, ForestConfig};
use crate::model::TrainedModel;

/// Fraction of samples held out for evaluation.
const TEST_FRACTION: f64 = 0.2;

/// Feature matrix and target vector in canonical dimension order.
#[derive(Debug, Clone)]
pub struct TrainingMatrix {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
    /// Samples dropped for carrying an unusable energy label.
    pub skipped: usize,
}

/// Project samples into a feature matrix ordered per [`FEATURE_NAMES`] and
/// the parallel energy target vector.
///
/// Samples with a non-finite or negative energy label are skipped and
/// logged rather than aborting the batch - one bad synthetic sample must not
/// invalidate a training run. Zero usable samples is `Error::EmptyDataset`.
pub fn prepare_training_matrix(samples: &[TrainingSample]) -> Result<TrainingMatrix> {
    if samples.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let mut x = Vec::with_capacity(samples.len());
    let mut y = Vec::with_capacity(samples.len());
    let mut skipped = 0;

    for (i, sample) in samples.iter().enumerate() {
        if !sample.energy_joules.is_finite() || sample.energy_joules < 0.0 {
            log::warn!(
                "skipping sample {i}: unusable energy label {}",
                sample.energy_joules
            );
            skipped += 1;
            continue;
        }
        x.push(sample.features.to_row(&FEATURE_NAMES)?);
        y.push(sample.energy_joules);
    }

    if x.is_empty() {
        return Err(Error::EmptyDataset);
    }

    Ok(TrainingMatrix { x, y, skipped })
}

/// Evaluation metrics from one training run.
///
/// With fewer than five samples the 20% test split floors to zero rows and
/// the test metrics are NaN; the training call itself still succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub train_mae: f64,
    pub test_mae: f64,
    pub train_r2: f64,
    pub test_r2: f64,
    /// Normalized impurity-reduction importance per canonical dimension.
    pub feature_importances: Vec<(String, f64)>,
    pub train_size: usize,
    pub test_size: usize,
    pub skipped_samples: usize,
}

/// Train the ensemble on an 80/20 split and evaluate both splits.
///
/// The split shuffle and every bootstrap derive from `config.seed`, so the
/// same matrix and configuration always produce an identical model.
pub fn train(matrix: &TrainingMatrix, config: &ForestConfig) -> Result<(TrainedModel, TrainingMetrics)> {
    let n = matrix.x.len();
    if n == 0 {
        return Err(Error::EmptyDataset);
    }

    let (train_idx, test_idx) = split_indices(n, config.seed);
    log::info!(
        "training on {} samples, holding out {} for evaluation",
        train_idx.len(),
        test_idx.len()
    );

    let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| matrix.x[i].clone()).collect();
    let train_y: Vec<f64> = train_idx.iter().map(|&i| matrix.y[i]).collect();
    let test_x: Vec<Vec<f64>> = test_idx.iter().map(|&i| matrix.x[i].clone()).collect();
    let test_y: Vec<f64> = test_idx.iter().map(|&i| matrix.y[i]).collect();

    let forest = Forest::fit(&train_x, &train_y, config);

    let train_pred: Vec<f64> = train_x.iter().map(|row| forest.predict(row)).collect();
    let test_pred: Vec<f64> = test_x.iter().map(|row| forest.predict(row)).collect();

    let importances = forest
        .feature_importances()
        .into_iter()
        .zip(FEATURE_NAMES)
        .map(|(importance, name)| (name.to_string(), importance))
        .collect();

    let metrics = TrainingMetrics {
        train_mae: mean_absolute_error(&train_y, &train_pred),
        test_mae: mean_absolute_error(&test_y, &test_pred),
        train_r2: r_squared(&train_y, &train_pred),
        test_r2: r_squared(&test_y, &test_pred),
        feature_importances: importances,
        train_size: train_idx.len(),
        test_size: test_idx.len(),
        skipped_samples: matrix.skipped,
    };

    log::info!(
        "training complete: train_mae={:.3} test_mae={:.3} train_r2={:.3} test_r2={:.3}",
        metrics.train_mae,
        metrics.test_mae,
        metrics.train_r2,
        metrics.test_r2
    );

    let model = TrainedModel {
        forest,
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
    };

    Ok((model, metrics))
}

/// Deterministic shuffled 80/20 split. The test partition floors to zero
/// rows for n < 5; the training partition is never empty.
fn split_indices(n: usize, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_len = (n as f64 * TEST_FRACTION) as usize;
    let test = indices[..test_len].to_vec();
    let train = indices[test_len..].to_vec();
    (train, test)
}

/// Mean absolute error; NaN for an empty split.
fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return f64::NAN;
    }
    let total: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum();
    total / actual.len() as f64
}

/// Coefficient of determination; NaN for an empty split, 0.0 when the
/// target has no variance (only reachable on degenerate datasets).
fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() {
        return f64::NAN;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{BigO, FeatureVector};

    fn sample(num_loops: u32, energy: f64) -> TrainingSample {
        TrainingSample {
            features: FeatureVector {
                num_loops,
                max_loop_depth: num_loops.min(1),
                ..Default::default()
            },
            energy_joules: energy,
            big_o: if num_loops > 0 { BigO::Linear } else { BigO::Constant },
            code_shape: None,
        }
    }

    #[test]
    fn test_prepare_empty_dataset() {
        let err = prepare_training_matrix(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
    }

    #[test]
    fn test_prepare_skips_bad_energy() {
        let samples = vec![
            sample(1, 10.0),
            sample(2, f64::NAN),
            sample(3, -4.0),
            sample(0, 1.0),
        ];
        let matrix = prepare_training_matrix(&samples).unwrap();
        assert_eq!(matrix.x.len(), 2);
        assert_eq!(matrix.skipped, 2);
    }

    #[test]
    fn test_prepare_all_samples_bad() {
        let samples = vec![sample(1, f64::INFINITY), sample(2, -1.0)];
        let err = prepare_training_matrix(&samples).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset));
    }

    #[test]
    fn test_prepare_row_order_is_canonical() {
        let samples = vec![sample(3, 12.0)];
        let matrix = prepare_training_matrix(&samples).unwrap();
        assert_eq!(matrix.x[0], samples[0].features.to_row(&FEATURE_NAMES).unwrap());
    }

    #[test]
    fn test_split_is_deterministic() {
        let (train_a, test_a) = split_indices(50, 42);
        let (train_b, test_b) = split_indices(50, 42);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(train_a.len(), 40);
        assert_eq!(test_a.len(), 10);
    }

    #[test]
    fn test_split_degenerate_single_sample() {
        let (train, test) = split_indices(1, 42);
        assert_eq!(train.len(), 1);
        assert!(test.is_empty());
    }

    #[test]
    fn test_metrics_on_perfect_fit() {
        let actual = [1.0, 2.0, 3.0];
        assert_eq!(mean_absolute_error(&actual, &actual), 0.0);
        assert_eq!(r_squared(&actual, &actual), 1.0);
    }

    #[test]
    fn test_metrics_on_empty_split() {
        assert!(mean_absolute_error(&[], &[]).is_nan());
        assert!(r_squared(&[], &[]).is_nan());
    }

    #[test]
    fn test_r_squared_constant_target() {
        assert_eq!(r_squared(&[5.0, 5.0], &[4.0, 6.0]), 0.0);
    }
}
