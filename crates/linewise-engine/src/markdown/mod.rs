//! Markdown in and out.
//!
//! [`parse`] turns a document into the [`Node`] tree using pulldown-cmark,
//! with strikethrough, tables, math and YAML frontmatter recognized so they
//! pass through untouched. [`stringify`] writes a transformed tree back by
//! splicing changed paragraphs into the original source.
//!
//! ```
//! use linewise_engine::ast::NodeType;
//! use linewise_engine::markdown::{parse, stringify};
//!
//! let source = "# Notes\n\nFirst line\nsecond line.\n";
//! let tree = parse(source);
//! assert_eq!(tree.children()[1].kind, NodeType::Paragraph);
//! assert_eq!(stringify(source, &tree).unwrap(), source);
//! ```

mod builder;
pub mod line_index;
mod stringify;

use thiserror::Error;

use crate::ast::Node;

pub use stringify::stringify;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkdownError {
    #[error("tree has {found} paragraphs but the source has {expected}")]
    ParagraphCountMismatch { expected: usize, found: usize },
}

/// Parse a Markdown document into a tree rooted at a `Root` node.
pub fn parse(source: &str) -> Node {
    builder::TreeBuilder::new(source).build()
}
