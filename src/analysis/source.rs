//! Python parsing front-end.
//!
//! Wraps a tree-sitter parse of one source unit. The tree is owned
//! transiently by the caller for the duration of one analysis pass and is
//! never mutated.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{Error, Result};

/// Holds a parsed tree-sitter tree and the source it came from.
///
/// Kept separate from the extracted features so the tree can be reused for
/// multiple analysis passes without re-parsing.
#[derive(Debug)]
pub struct ParsedSource {
    /// The tree-sitter parse tree.
    pub tree: Tree,
    /// The original source code (kept for node text extraction).
    pub source: Vec<u8>,
}

impl ParsedSource {
    /// Root node of the parse tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Parser for Python source units.
pub struct PythonParser {
    language: Language,
}

impl PythonParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    /// Parse one source unit.
    ///
    /// Fails with `Error::Parse` if the source is not syntactically valid
    /// Python; the message carries the location of the first syntax error.
    pub fn parse(&self, source: &str) -> Result<ParsedSource> {
        let mut parser = Parser::new();
        parser.set_language(&self.language).map_err(|e| Error::Parse {
            message: format!("failed to initialize Python grammar: {e}"),
        })?;

        let tree = parser.parse(source, None).ok_or_else(|| Error::Parse {
            message: "parser produced no tree".to_string(),
        })?;

        let parsed = ParsedSource {
            tree,
            source: source.as_bytes().to_vec(),
        };

        if parsed.root().has_error() {
            return Err(Error::Parse {
                message: first_syntax_error(&parsed),
            });
        }

        Ok(parsed)
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate the first ERROR or missing node for the diagnostic message.
fn first_syntax_error(parsed: &ParsedSource) -> String {
    fn find(node: Node) -> Option<Node> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        children.into_iter().find_map(find)
    }

    match find(parsed.root()) {
        Some(node) => {
            let pos = node.start_position();
            format!("syntax error at line {}, column {}", pos.row + 1, pos.column + 1)
        }
        None => "syntax error".to_string(),
    }
}
