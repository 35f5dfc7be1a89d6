//! Formatting a whole Markdown document.

use crate::markdown::{self, MarkdownError};
use crate::reflow::{self, Margins, ReflowReport};

/// A formatted document and the paragraphs that were left as they were.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatted {
    pub output: String,
    pub report: ReflowReport,
}

impl Formatted {
    pub fn changed(&self, source: &str) -> bool {
        self.output != source
    }
}

/// Parse, reflow and write back `source`.
pub fn format(source: &str, margins: Margins) -> Result<Formatted, MarkdownError> {
    let tree = markdown::parse(source);
    let transformed = reflow::transform(tree, margins);
    let output = markdown::stringify(source, &transformed.tree)?;
    Ok(Formatted {
        output,
        report: transformed.report,
    })
}
