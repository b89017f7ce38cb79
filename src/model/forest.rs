//! Bagged ensemble of regression trees.
//!
//! Each tree is fitted on a bootstrap resample of the training rows; tree
//! fitting is embarrassingly parallel and fans out across cores with rayon.
//! Per-tree seeds are derived from the configured seed, so a fit is
//! reproducible regardless of worker scheduling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::tree::{RegressionTree, TreeParams};

/// Ensemble configuration.
///
/// The defaults mirror the regressor this crate's model reproduces: 100
/// trees, depth 15, split at 5 samples, 2 samples per leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: u32,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Seed for the train/test shuffle and the per-tree bootstraps.
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 15,
            min_samples_split: 5,
            min_samples_leaf: 2,
            seed: 42,
        }
    }
}

impl ForestConfig {
    fn tree_params(&self) -> TreeParams {
        TreeParams {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
        }
    }
}

/// A fitted bagged-tree ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl Forest {
    /// Fit the ensemble. `x` rows and `y` must be parallel and non-empty.
    pub fn fit(x: &[Vec<f64>], y: &[f64], config: &ForestConfig) -> Self {
        debug_assert_eq!(x.len(), y.len());
        let n = x.len();
        let n_features = x.first().map_or(0, Vec::len);
        let params = config.tree_params();

        let trees: Vec<RegressionTree> = (0..config.n_trees)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(tree_idx as u64));
                let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                RegressionTree::fit(x, y, &indices, n_features, &params)
            })
            .collect();

        Self { trees, n_features }
    }

    /// Mean prediction across the ensemble.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let per_tree = self.predict_each(row);
        per_tree.iter().sum::<f64>() / per_tree.len() as f64
    }

    /// Each constituent tree's prediction, in tree order. The spread across
    /// these is the confidence signal.
    pub fn predict_each(&self, row: &[f64]) -> Vec<f64> {
        self.trees.iter().map(|tree| tree.predict(row)).collect()
    }

    /// Normalized per-feature importances: total impurity reduction summed
    /// across all trees, scaled to sum to 1. All zeros if no split ever
    /// fired (e.g. a constant target).
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut totals = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (total, imp) in totals.iter_mut().zip(tree.importances()) {
                *total += imp;
            }
        }

        let sum: f64 = totals.iter().sum();
        if sum > 0.0 {
            for total in &mut totals {
                *total /= sum;
            }
        }
        totals
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_data() -> (Vec<Vec<f64>>, Vec<f64>) {
        // Threshold effect: recursion-like indicator dominates the target.
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..40 {
            let flag = f64::from(i % 2);
            x.push(vec![flag, f64::from(i % 5)]);
            y.push(if flag > 0.5 { 50.0 } else { 5.0 });
        }
        (x, y)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 25,
            min_samples_split: 2,
            min_samples_leaf: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_fit_learns_step_function() {
        let (x, y) = step_data();
        let forest = Forest::fit(&x, &y, &small_config());

        assert!((forest.predict(&[1.0, 2.0]) - 50.0).abs() < 1.0);
        assert!((forest.predict(&[0.0, 2.0]) - 5.0).abs() < 1.0);
    }

    #[test]
    fn test_deterministic_fit() {
        let (x, y) = step_data();
        let a = Forest::fit(&x, &y, &small_config());
        let b = Forest::fit(&x, &y, &small_config());

        let row = [1.0, 3.0];
        assert_eq!(a.predict_each(&row), b.predict_each(&row));
    }

    #[test]
    fn test_importances_normalized() {
        let (x, y) = step_data();
        let forest = Forest::fit(&x, &y, &small_config());

        let importances = forest.feature_importances();
        assert_eq!(importances.len(), 2);
        let sum: f64 = importances.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        // The step feature carries essentially all the signal.
        assert!(importances[0] > 0.9);
    }

    #[test]
    fn test_constant_target_importances_all_zero() {
        let x = vec![vec![0.0], vec![1.0], vec![2.0]];
        let y = vec![7.0, 7.0, 7.0];
        let forest = Forest::fit(&x, &y, &small_config());

        assert_eq!(forest.predict(&[1.0]), 7.0);
        assert!(forest.feature_importances().iter().all(|&imp| imp == 0.0));
    }

    #[test]
    fn test_single_row_fit() {
        let x = vec![vec![1.0, 0.0]];
        let y = vec![3.5];
        let forest = Forest::fit(&x, &y, &ForestConfig::default());
        assert_eq!(forest.predict(&[9.0, 9.0]), 3.5);
    }
}
