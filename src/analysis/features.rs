//! The structural feature vector and its canonical dimension schema.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The fixed, ordered set of feature dimension names.
///
/// Training and prediction must agree on this list byte-for-byte; the model
/// store persists it alongside the fitted ensemble and refuses to load a
/// model whose list diverges.
pub const FEATURE_NAMES: [&str; 8] = [
    "num_loops",
    "max_loop_depth",
    "num_function_calls",
    "num_list_ops",
    "has_recursion",
    "nested_loops",
    "has_sort",
    "string_concat_in_loop",
];

/// Structural features extracted from one source unit.
///
/// The dimension set is closed: counts are non-negative integers, indicator
/// dimensions are booleans that project to 0/1 in the numeric row. Built
/// fresh per analysis call and immutable after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Count of all loop constructs (for and while).
    pub num_loops: u32,
    /// Maximum static nesting depth of loops; a top-level loop has depth 1.
    pub max_loop_depth: u32,
    /// Count of all call expressions.
    pub num_function_calls: u32,
    /// Count of mutating sequence-operation calls (append/extend/insert/remove).
    pub num_list_ops: u32,
    /// A function contains a call to its own name. Direct self-recursion
    /// only; mutual recursion across functions is not detected.
    pub has_recursion: bool,
    /// Any loop sits at nesting depth >= 2. Redundant with `max_loop_depth`
    /// but kept as an explicit scoring signal.
    pub nested_loops: bool,
    /// A sort-family operation is invoked (`.sort()` or the `sorted` builtin).
    pub has_sort: bool,
    /// A `+=` accumulation appears anywhere inside a loop body.
    pub string_concat_in_loop: bool,
}

impl FeatureVector {
    /// Look up a dimension by canonical name. Returns `None` for names
    /// outside the closed schema.
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "num_loops" => f64::from(self.num_loops),
            "max_loop_depth" => f64::from(self.max_loop_depth),
            "num_function_calls" => f64::from(self.num_function_calls),
            "num_list_ops" => f64::from(self.num_list_ops),
            "has_recursion" => indicator(self.has_recursion),
            "nested_loops" => indicator(self.nested_loops),
            "has_sort" => indicator(self.has_sort),
            "string_concat_in_loop" => indicator(self.string_concat_in_loop),
            _ => return None,
        };
        Some(value)
    }

    /// Project the vector into a numeric row ordered by `names`.
    ///
    /// Fails with `Error::MissingFeature` if any requested name is not a
    /// canonical dimension - a default is never substituted.
    pub fn to_row<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<f64>> {
        names
            .iter()
            .map(|name| {
                self.get(name.as_ref()).ok_or_else(|| Error::MissingFeature {
                    name: name.as_ref().to_string(),
                })
            })
            .collect()
    }

    /// The numeric row in canonical order.
    pub fn values(&self) -> [f64; 8] {
        [
            f64::from(self.num_loops),
            f64::from(self.max_loop_depth),
            f64::from(self.num_function_calls),
            f64::from(self.num_list_ops),
            indicator(self.has_recursion),
            indicator(self.nested_loops),
            indicator(self.has_sort),
            indicator(self.string_concat_in_loop),
        ]
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
