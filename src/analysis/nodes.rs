//! Closed node classification for the feature walk.
//!
//! Tree-sitter exposes node kinds as strings; the extractor only cares about
//! a handful of them. Classifying into a closed sum type up front keeps the
//! traversal a plain `match` instead of scattered string comparisons.

use phf::{phf_set, Set};

/// The node kinds the feature extractor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeClass {
    /// `for` or `while` statement.
    Loop,
    /// Call expression.
    Call,
    /// Function definition.
    FunctionDef,
    /// Augmented assignment (`x += y` and friends).
    AugmentedAssign,
    /// Everything else; traversed but not counted.
    Other,
}

impl NodeClass {
    /// Classify a tree-sitter node kind.
    pub fn of(kind: &str) -> Self {
        match kind {
            "for_statement" | "while_statement" => NodeClass::Loop,
            "call" => NodeClass::Call,
            "function_definition" => NodeClass::FunctionDef,
            "augmented_assignment" => NodeClass::AugmentedAssign,
            _ => NodeClass::Other,
        }
    }
}

/// Mutating sequence operations counted as list ops.
pub static LIST_MUTATORS: Set<&'static str> = phf_set! {
    "append",
    "extend",
    "insert",
    "remove",
};

/// Sort-family operations: the in-place method and the sorting builtin.
pub static SORT_CALLS: Set<&'static str> = phf_set! {
    "sort",
    "sorted",
};

/// The augmented-assignment operator that flags accumulation in a loop.
pub const AUGMENTED_ADD: &str = "+=";
