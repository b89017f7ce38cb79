//! Single CART regression tree.
//!
//! Splits minimize the summed squared error of the child partitions
//! (equivalently, maximize variance reduction). Stopping follows the usual
//! trio: maximum depth, minimum samples to split, minimum samples per leaf.
//! Impurity reduction is accumulated per feature during fitting and feeds
//! the ensemble's feature importances.

use serde::{Deserialize, Serialize};

/// Stopping parameters for tree construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: u32,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

/// A fitted tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    root: TreeNode,
    /// Unnormalized impurity reduction attributed to each feature.
    importances: Vec<f64>,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `indices` (with repetitions, as
    /// produced by bootstrap resampling).
    pub fn fit(
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        n_features: usize,
        params: &TreeParams,
    ) -> Self {
        let mut importances = vec![0.0; n_features];
        let root = build(x, y, indices, 0, n_features, params, &mut importances);
        Self { root, importances }
    }

    /// Predict the target for one feature row.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut node = &self.root;
        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Unnormalized per-feature impurity reduction for this tree.
    pub fn importances(&self) -> &[f64] {
        &self.importances
    }
}

/// Sum and sum-of-squares over the selected targets.
fn target_sums(y: &[f64], indices: &[usize]) -> (f64, f64) {
    indices.iter().fold((0.0, 0.0), |(s, ss), &i| {
        (s + y[i], ss + y[i] * y[i])
    })
}

fn build(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    depth: u32,
    n_features: usize,
    params: &TreeParams,
    importances: &mut [f64],
) -> TreeNode {
    let n = indices.len();
    let (sum, sum_sq) = target_sums(y, indices);
    let mean = sum / n as f64;
    let parent_sse = sum_sq - sum * sum / n as f64;

    if depth >= params.max_depth || n < params.min_samples_split || parent_sse <= 1e-12 {
        return TreeNode::Leaf { value: mean };
    }

    let split = match best_split(x, y, indices, n_features, parent_sse, params) {
        Some(s) => s,
        None => return TreeNode::Leaf { value: mean },
    };

    importances[split.feature] += split.reduction;

    let left = build(
        x,
        y,
        &split.left_indices,
        depth + 1,
        n_features,
        params,
        importances,
    );
    let right = build(
        x,
        y,
        &split.right_indices,
        depth + 1,
        n_features,
        params,
        importances,
    );

    TreeNode::Split {
        feature: split.feature,
        threshold: split.threshold,
        left: Box::new(left),
        right: Box::new(right),
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    reduction: f64,
    left_indices: Vec<usize>,
    right_indices: Vec<usize>,
}

/// Exhaustive split search over every feature and every boundary between
/// distinct sorted values. All features are considered at every split
/// (bagging only - no per-split feature subsampling).
fn best_split(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    n_features: usize,
    parent_sse: f64,
    params: &TreeParams,
) -> Option<BestSplit> {
    let n = indices.len();
    let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, reduction)

    for feature in 0..n_features {
        let mut pairs: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (x[i][feature], y[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        // Prefix sums over the sorted targets.
        let mut left_sum = 0.0;
        let mut left_sum_sq = 0.0;
        let (total_sum, total_sum_sq) = pairs
            .iter()
            .fold((0.0, 0.0), |(s, ss), &(_, t)| (s + t, ss + t * t));

        for k in 1..n {
            let (value, target) = pairs[k - 1];
            left_sum += target;
            left_sum_sq += target * target;

            // Only boundaries between distinct values are valid thresholds.
            if value == pairs[k].0 {
                continue;
            }
            if k < params.min_samples_leaf || n - k < params.min_samples_leaf {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sum_sq = total_sum_sq - left_sum_sq;
            let left_sse = left_sum_sq - left_sum * left_sum / k as f64;
            let right_sse = right_sum_sq - right_sum * right_sum / (n - k) as f64;
            let reduction = parent_sse - (left_sse + right_sse);

            if reduction > best.map_or(1e-12, |(_, _, r)| r) {
                let threshold = (value + pairs[k].0) / 2.0;
                best = Some((feature, threshold, reduction));
            }
        }
    }

    let (feature, threshold, reduction) = best?;
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .partition(|&&i| x[i][feature] <= threshold);

    Some(BestSplit {
        feature,
        threshold,
        reduction,
        left_indices,
        right_indices,
    })
}
