//! # linewise-engine
//!
//! Reflows the prose of a Markdown document onto semantic lines, changing
//! nothing but whitespace and line breaks.
//!
//! ```text
//! Markdown source → markdown::parse → Node tree → reflow::transform → markdown::stringify
//! ```
//!
//! ## Modules
//!
//! - [`ast`] - the inline node tree and `node_length`
//! - [`markdown`] - pulldown-cmark to tree, and tree back into the source
//! - [`reflow`] - margins, semantic line packing, the paragraph state machine
//! - [`format`](mod@format) - the whole pipeline for one document
//!
//! ```
//! use linewise_engine::{Margins, format};
//!
//! let source = "One clause; another clause. A third, short sentence.\n";
//! let formatted = format(source, Margins::default()).unwrap();
//! assert_eq!(formatted.output, source);
//! ```

pub mod ast;
pub mod format;
pub mod markdown;
pub mod reflow;

pub use ast::{Node, NodeType, Point, Position};
pub use format::{Formatted, format};
pub use markdown::MarkdownError;
pub use reflow::{Margins, ReflowError, ReflowReport, SkippedParagraph, Transformed, transform};
