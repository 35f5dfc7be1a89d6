//! # Reflow
//!
//! Puts the prose of every paragraph onto semantic lines: one clause or
//! sentence per line, with short neighbours packed together.
//!
//! ## Pipeline
//!
//! ```text
//! Node tree → transform → Paragraph → paragraph::reflow
//!                                       ├─ Text + Link + InlineCode run: flatten with placeholders
//!                                       │    → grammar parse → semantics::render → forced breaks
//!                                       └─ Image / Html / Math: counted whole, never moved
//! ```
//!
//! - [`semantics`] packs the semantic lines of one text run under the margins.
//! - [`state`] is the per-paragraph state machine: phases, and the running
//!   line state that decides where unbreakable nodes force a break.
//! - [`paragraph`] walks one paragraph's inline children.
//!
//! ## Margins
//!
//! Two thresholds drive every decision. A line shorter than `min` wants
//! company and absorbs the next semantic line, as long as the result stays
//! strictly below `max`. A line at or past `min` stands on its own.
//!
//! ```
//! use linewise_engine::reflow::{Margins, transform};
//! use linewise_engine::markdown::parse;
//!
//! let tree = parse("A short sentence! And another one.\n");
//! let result = transform(tree, Margins::default());
//! assert!(result.report.is_clean());
//! ```
//!
//! ## Failure
//!
//! A paragraph is reflowed on a private copy of its children. If anything
//! goes wrong the copy is thrown away, the paragraph keeps its original text,
//! and the problem is listed in the [`ReflowReport`]. Text the grammar cannot
//! match is not a failure: the unmatched words are kept verbatim.

pub mod paragraph;
pub mod semantics;
pub mod state;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ast::{LengthError, Node, NodeType, Position};

/// Line length thresholds, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub min: usize,
    pub max: usize,
}

impl Margins {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(45, 80)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflowError {
    #[error("structural invariant violated: {0}")]
    StructuralInvariantViolation(String),
    #[error("cannot measure node: {0}")]
    LengthUnresolvable(#[from] LengthError),
}

/// A paragraph left as it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedParagraph {
    pub position: Option<Position>,
    pub error: ReflowError,
}

impl fmt::Display for SkippedParagraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(
                f,
                "{}:{}: {}",
                position.start.line, position.start.column, self.error
            ),
            None => write!(f, "{}", self.error),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReflowReport {
    pub skipped: Vec<SkippedParagraph>,
}

impl ReflowReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// A transformed tree and what could not be reflowed in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub tree: Node,
    pub report: ReflowReport,
}

/// Reflow every paragraph in `tree`.
///
/// Running it again on its own output changes nothing.
pub fn transform(mut tree: Node, margins: Margins) -> Transformed {
    let mut report = ReflowReport::default();
    visit(&mut tree, margins, &mut report);
    Transformed { tree, report }
}

fn visit(node: &mut Node, margins: Margins, report: &mut ReflowReport) {
    if node.kind == NodeType::Paragraph {
        if let Err(error) = paragraph::reflow(node, margins) {
            let skipped = SkippedParagraph {
                position: node.position,
                error,
            };
            log::debug!("paragraph left unmodified: {skipped}");
            report.skipped.push(skipped);
        }
        return;
    }

    if let Some(children) = node.children_mut() {
        for child in children {
            visit(child, margins, report);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Point, Position};
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> Node {
        Node::synthetic_text(value)
    }

    fn paragraph(children: Vec<Node>) -> Node {
        Node::parent(NodeType::Paragraph, None, children)
    }

    #[test]
    fn visits_nested_paragraphs() {
        let tree = Node::parent(
            NodeType::Root,
            None,
            vec![Node::parent(
                NodeType::BlockQuote,
                None,
                vec![paragraph(vec![text(
                    "Lorem ipsum dolor sit amet, consectetur adipiscing elit. Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.",
                )])],
            )],
        );

        let result = transform(tree, Margins::default());
        let value = result.tree.children()[0].children()[0].children()[0]
            .value()
            .unwrap()
            .to_string();
        assert_eq!(
            value,
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\nSed do eiusmod tempor incididunt ut labore et dolore magna aliqua."
        );
        assert!(result.report.is_clean());
    }

    #[test]
    fn unmeasurable_node_skips_only_its_paragraph() {
        let point = |line| Point {
            line,
            column: 1,
            offset: 0,
        };
        let broken = paragraph(vec![
            text("A sentence that is long enough to pass the minimum margin "),
            Node::parent(
                NodeType::Link,
                Some(Position::new(point(1), point(2))),
                vec![text("link")],
            ),
        ]);
        let fine = paragraph(vec![text("Short one. Another.")]);
        let tree = Node::parent(NodeType::Root, None, vec![broken.clone(), fine]);

        let result = transform(tree, Margins::default());

        assert_eq!(result.tree.children()[0], broken);
        assert_eq!(result.report.skipped.len(), 1);
        assert!(matches!(
            result.report.skipped[0].error,
            ReflowError::LengthUnresolvable(_)
        ));
        assert_eq!(
            result.tree.children()[1].children()[0].value(),
            Some("Short one. Another.")
        );
    }

    #[test]
    fn skipped_paragraph_display() {
        let skipped = SkippedParagraph {
            position: Some(Position::new(
                Point {
                    line: 3,
                    column: 5,
                    offset: 20,
                },
                Point {
                    line: 4,
                    column: 1,
                    offset: 40,
                },
            )),
            error: ReflowError::StructuralInvariantViolation("bad".to_string()),
        };
        assert_eq!(
            skipped.to_string(),
            "3:5: structural invariant violated: bad"
        );
    }
}
