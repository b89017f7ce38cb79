//! Big-O classification and heuristic energy-impact scoring.
//!
//! Both are pure functions of the feature vector: the label falls out of a
//! strict priority order, the score is a weighted linear combination capped
//! at 100. Labels are heuristic growth classes assigned from structure, not
//! proven analytically.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::analysis::features::FeatureVector;

/// Score weights per feature dimension.
///
/// Tunable design constants reflecting relative energy-impact severity:
/// recursion weighs highest, raw call count lowest. Not derived from data.
pub mod weights {
    pub const NUM_LOOPS: u32 = 10;
    pub const MAX_LOOP_DEPTH: u32 = 15;
    pub const NESTED_LOOPS: u32 = 20;
    pub const NUM_FUNCTION_CALLS: u32 = 2;
    pub const NUM_LIST_OPS: u32 = 5;
    pub const HAS_RECURSION: u32 = 30;
    pub const HAS_SORT: u32 = 10;
    pub const STRING_CONCAT_IN_LOOP: u32 = 15;
}

/// Upper bound of the complexity score.
pub const MAX_SCORE: f64 = 100.0;

/// Coarse asymptotic-growth classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BigO {
    Constant,
    Linear,
    Linearithmic,
    Quadratic,
    /// Polynomial of degree >= 3 (the degree is the loop nesting depth).
    Polynomial(u32),
    ExponentialOrWorse,
}

impl BigO {
    /// The textual form used in reports and persisted samples.
    pub fn label(&self) -> String {
        match self {
            BigO::Constant => "O(1)".to_string(),
            BigO::Linear => "O(n)".to_string(),
            BigO::Linearithmic => "O(n log n)".to_string(),
            BigO::Quadratic => "O(n²)".to_string(),
            BigO::Polynomial(degree) => format!("O(n^{degree})"),
            BigO::ExponentialOrWorse => "O(2^n) or worse".to_string(),
        }
    }
}

impl fmt::Display for BigO {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for BigO {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "O(1)" => Ok(BigO::Constant),
            "O(n)" => Ok(BigO::Linear),
            "O(n log n)" => Ok(BigO::Linearithmic),
            "O(n²)" | "O(n^2)" => Ok(BigO::Quadratic),
            "O(2^n) or worse" => Ok(BigO::ExponentialOrWorse),
            other => {
                let degree = other
                    .strip_prefix("O(n^")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .and_then(|digits| digits.parse::<u32>().ok());
                match degree {
                    Some(d) if d >= 3 => Ok(BigO::Polynomial(d)),
                    _ => Err(format!("unknown complexity label: {other}")),
                }
            }
        }
    }
}

// Serialized as the textual form so persisted samples and JSON reports are
// self-describing.
impl Serialize for BigO {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for BigO {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// The classification output: label plus bounded heuristic score.
///
/// Derived deterministically from a feature vector; always recomputed,
/// never stored with independent identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityResult {
    pub big_o: BigO,
    /// Heuristic energy-impact score in [0, 100].
    pub complexity_score: f64,
}

/// Classify a feature vector. Pure and total: every vector produces a result.
pub fn classify(features: &FeatureVector) -> ComplexityResult {
    ComplexityResult {
        big_o: estimate_big_o(features),
        complexity_score: calculate_score(features),
    }
}

/// Label decision in strict priority order; first match wins.
fn estimate_big_o(features: &FeatureVector) -> BigO {
    if features.has_recursion {
        return BigO::ExponentialOrWorse;
    }

    let depth = features.max_loop_depth;
    if depth >= 3 {
        BigO::Polynomial(depth)
    } else if features.nested_loops || depth == 2 {
        BigO::Quadratic
    } else if features.has_sort {
        BigO::Linearithmic
    } else if features.num_loops > 0 {
        BigO::Linear
    } else {
        BigO::Constant
    }
}

fn calculate_score(features: &FeatureVector) -> f64 {
    let mut score = 0u32;

    score += features.num_loops * weights::NUM_LOOPS;
    score += features.max_loop_depth * weights::MAX_LOOP_DEPTH;
    score += u32::from(features.nested_loops) * weights::NESTED_LOOPS;

    score += features.num_function_calls * weights::NUM_FUNCTION_CALLS;
    score += features.num_list_ops * weights::NUM_LIST_OPS;

    score += u32::from(features.has_recursion) * weights::HAS_RECURSION;
    score += u32::from(features.has_sort) * weights::HAS_SORT;
    score += u32::from(features.string_concat_in_loop) * weights::STRING_CONCAT_IN_LOOP;

    f64::from(score).min(MAX_SCORE)
}
