//! Structural feature extraction.
//!
//! One full traversal of the parse tree carries the current loop depth and
//! fills every dimension except `has_recursion`, which needs a sub-traversal
//! of each function body looking for self-referential calls. That makes the
//! whole pass O(F*N) for F functions over N nodes, which is acceptable for
//! source-file-sized inputs.

use tree_sitter::Node;

use crate::analysis::features::FeatureVector;
use crate::analysis::nodes::{NodeClass, AUGMENTED_ADD, LIST_MUTATORS, SORT_CALLS};
use crate::analysis::source::{ParsedSource, PythonParser};
use crate::error::Result;

/// Extracts the structural feature vector from Python source text.
pub struct FeatureExtractor {
    parser: PythonParser,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            parser: PythonParser::new(),
        }
    }

    /// Parse `source` and extract its feature vector.
    ///
    /// Fails with `Error::Parse` for syntactically invalid source; otherwise
    /// always succeeds. Extraction is a pure function of the source text.
    pub fn extract(&self, source: &str) -> Result<FeatureVector> {
        let parsed = self.parser.parse(source)?;
        Ok(extract_from_tree(&parsed))
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract features from an already-parsed source unit.
pub fn extract_from_tree(parsed: &ParsedSource) -> FeatureVector {
    let mut walk = Walk {
        parsed,
        features: FeatureVector::default(),
        functions: Vec::new(),
    };
    walk.visit(parsed.root(), 0);

    // Recursion detection: one sub-traversal per function definition,
    // looking for a bare-identifier call matching the function's own name.
    for func in &walk.functions {
        let name = match func.child_by_field_name("name") {
            Some(n) => parsed.node_text(n),
            None => continue,
        };
        if name.is_empty() {
            continue;
        }
        if contains_self_call(parsed, *func, name) {
            walk.features.has_recursion = true;
            break;
        }
    }

    log::debug!(
        "extracted features: loops={} depth={} calls={}",
        walk.features.num_loops,
        walk.features.max_loop_depth,
        walk.features.num_function_calls
    );

    walk.features
}

struct Walk<'a> {
    parsed: &'a ParsedSource,
    features: FeatureVector,
    functions: Vec<Node<'a>>,
}

impl<'a> Walk<'a> {
    /// Depth-first visit. `loop_depth` counts the enclosing loop constructs;
    /// nesting counts through intermediate non-loop nodes, so a loop inside
    /// an `if` inside a loop still sits at depth 2.
    fn visit(&mut self, node: Node<'a>, loop_depth: u32) {
        let mut child_depth = loop_depth;

        match NodeClass::of(node.kind()) {
            NodeClass::Loop => {
                child_depth = loop_depth + 1;
                self.features.num_loops += 1;
                if child_depth > self.features.max_loop_depth {
                    self.features.max_loop_depth = child_depth;
                }
                if child_depth >= 2 {
                    self.features.nested_loops = true;
                }
            }
            NodeClass::Call => {
                self.features.num_function_calls += 1;
                self.classify_callee(node);
            }
            NodeClass::FunctionDef => {
                self.functions.push(node);
            }
            NodeClass::AugmentedAssign => {
                if loop_depth > 0 && self.is_add_assignment(node) {
                    self.features.string_concat_in_loop = true;
                }
            }
            NodeClass::Other => {}
        }

        let mut cursor = node.walk();
        let children: Vec<Node<'a>> = node.children(&mut cursor).collect();
        for child in children {
            self.visit(child, child_depth);
        }
    }

    /// Inspect a call's callee for list-op and sort-family names.
    fn classify_callee(&mut self, call: Node<'a>) {
        let callee = match call.child_by_field_name("function") {
            Some(n) => n,
            None => return,
        };

        match callee.kind() {
            // Bare identifier call: only the sorting builtin is interesting.
            "identifier" => {
                if SORT_CALLS.contains(self.parsed.node_text(callee)) {
                    self.features.has_sort = true;
                }
            }
            // Method call: check the attribute name against both sets.
            "attribute" => {
                if let Some(attr) = callee.child_by_field_name("attribute") {
                    let method = self.parsed.node_text(attr);
                    if LIST_MUTATORS.contains(method) {
                        self.features.num_list_ops += 1;
                    }
                    if SORT_CALLS.contains(method) {
                        self.features.has_sort = true;
                    }
                }
            }
            _ => {}
        }
    }

    fn is_add_assignment(&self, node: Node<'a>) -> bool {
        node.child_by_field_name("operator")
            .map(|op| op.kind() == AUGMENTED_ADD)
            .unwrap_or(false)
    }
}

/// Whether `node`'s subtree contains a call to the bare identifier `name`.
fn contains_self_call(parsed: &ParsedSource, node: Node, name: &str) -> bool {
    if node.kind() == "call" {
        if let Some(callee) = node.child_by_field_name("function") {
            if callee.kind() == "identifier" && parsed.node_text(callee) == name {
                return true;
            }
        }
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .any(|child| contains_self_call(parsed, child, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> FeatureVector {
        FeatureExtractor::new().extract(source).unwrap()
    }

    #[test]
    fn test_empty_source() {
        let features = extract("x = 1\n");
        assert_eq!(features, FeatureVector::default());
    }

    #[test]
    fn test_single_loop() {
        let features = extract("for i in range(10):\n    total = i\n");
        assert_eq!(features.num_loops, 1);
        assert_eq!(features.max_loop_depth, 1);
        assert!(!features.nested_loops);
    }

    #[test]
    fn test_nested_loops() {
        let source = "\
for i in range(10):
    for j in range(10):
        pass
";
        let features = extract(source);
        assert_eq!(features.num_loops, 2);
        assert_eq!(features.max_loop_depth, 2);
        assert!(features.nested_loops);
    }

    #[test]
    fn test_loop_depth_counts_through_branches() {
        let source = "\
for i in range(10):
    if i % 2 == 0:
        while i > 0:
            i -= 1
";
        let features = extract(source);
        assert_eq!(features.num_loops, 2);
        assert_eq!(features.max_loop_depth, 2);
        assert!(features.nested_loops);
    }

    #[test]
    fn test_triple_nesting() {
        let source = "\
for i in range(5):
    for j in range(5):
        for k in range(5):
            pass
";
        let features = extract(source);
        assert_eq!(features.max_loop_depth, 3);
    }

    #[test]
    fn test_sibling_loops_do_not_nest() {
        let source = "\
for i in range(10):
    pass
for j in range(10):
    pass
";
        let features = extract(source);
        assert_eq!(features.num_loops, 2);
        assert_eq!(features.max_loop_depth, 1);
        assert!(!features.nested_loops);
    }

    #[test]
    fn test_comprehension_is_not_a_loop() {
        let features = extract("squares = [x * x for x in range(10)]\n");
        assert_eq!(features.num_loops, 0);
    }

    #[test]
    fn test_call_counts() {
        let source = "\
data = []
data.append(1)
data.extend([2, 3])
data.remove(1)
print(len(data))
";
        let features = extract(source);
        // append, extend, remove, print, len
        assert_eq!(features.num_function_calls, 5);
        assert_eq!(features.num_list_ops, 3);
    }

    #[test]
    fn test_sort_method_and_builtin() {
        let features = extract("data.sort()\n");
        assert!(features.has_sort);

        let features = extract("result = sorted(data)\n");
        assert!(features.has_sort);

        let features = extract("data.reverse()\n");
        assert!(!features.has_sort);
    }

    #[test]
    fn test_string_concat_in_loop() {
        let source = "\
out = ''
for chunk in chunks:
    out += chunk
";
        let features = extract(source);
        assert!(features.string_concat_in_loop);
    }

    #[test]
    fn test_concat_outside_loop_not_flagged() {
        let features = extract("out = ''\nout += 'tail'\n");
        assert!(!features.string_concat_in_loop);
    }

    #[test]
    fn test_non_add_augmented_assignment_not_flagged() {
        let source = "\
total = 1
for i in range(10):
    total *= i
";
        let features = extract(source);
        assert!(!features.string_concat_in_loop);
    }

    #[test]
    fn test_direct_recursion() {
        let source = "\
def fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)
";
        let features = extract(source);
        assert!(features.has_recursion);
    }

    #[test]
    fn test_mutual_recursion_not_detected() {
        // Known limitation: only direct self-calls count.
        let source = "\
def ping(n):
    return pong(n - 1)

def pong(n):
    return ping(n - 1)
";
        let features = extract(source);
        assert!(!features.has_recursion);
    }

    #[test]
    fn test_method_call_with_own_name_not_recursion() {
        // Only bare-identifier callees count, mirroring the name-based check.
        let source = "\
def process(items):
    return worker.process(items)
";
        let features = extract(source);
        assert!(!features.has_recursion);
    }

    #[test]
    fn test_idempotent_extraction() {
        let source = "\
def find_duplicates(data):
    result = []
    for i in range(len(data)):
        for j in range(i + 1, len(data)):
            if data[i] == data[j]:
                result.append(data[i])
    return result
";
        let extractor = FeatureExtractor::new();
        let first = extractor.extract(source).unwrap();
        let second = extractor.extract(source).unwrap();
        assert_eq!(first, second);
    }
}
