//! Packing semantic lines under the margins.
//!
//! A single greedy pass over the SEMANTIC_LINE nodes of a successful match.
//! Each line is a candidate. It is merged onto the previous committed line
//! when that line is still short (`< min`) and the result stays strictly
//! below `max`; otherwise it starts a new line.
//!
//! Placeholders stay in the output so the caller can find its unbreakable
//! nodes again. Their markers take no room: a placeholder is as wide as the
//! content it wraps.
//!
//! A candidate that would open a Markdown block at the start of a line (`1)`,
//! `2.`, `- `, `# `, `> ` and friends) is never moved to a new line. It stays
//! on the previous one even past `max`, since a new line there would turn the
//! paragraph into a list, a heading or a quote.

use linewise_grammar::{SyntaxKind, SyntaxNode, placeholder};

use super::{Margins, ReflowError};

/// The packed lines of one text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub lines: Vec<String>,
    /// The first candidate did not fit behind the starting column.
    pub broke_before: bool,
}

impl Rendered {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Candidate text of a semantic line: whitespace collapsed to single spaces.
fn candidate(line: &SyntaxNode) -> String {
    let mut text = String::new();
    for token in line
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
    {
        if token.kind() == SyntaxKind::WHITESPACE {
            text.push(' ');
        } else {
            text.push_str(token.text());
        }
    }
    text
}

/// Columns taken by `text`, placeholder markers excluded.
pub fn width(text: &str) -> usize {
    placeholder::strip(text).chars().count()
}

/// True when a line starting with `text` would open a Markdown block instead
/// of continuing the paragraph.
pub fn opens_block(text: &str) -> bool {
    let text = text.trim_start_matches(' ');
    let first_word = text.split(' ').next().unwrap_or_default();
    let marker_then_space =
        |marker: &str| first_word == marker || text.starts_with(&format!("{marker} "));

    // Bullets, quotes, headings.
    if ["-", "+", "*"].into_iter().any(marker_then_space) || text.starts_with('>') {
        return true;
    }
    let hashes = first_word.chars().take_while(|&c| c == '#').count();
    if (1..=6).contains(&hashes) && hashes == first_word.len() {
        return true;
    }

    // Ordered list items: up to nine digits, then `.` or `)`.
    let digits = first_word.chars().take_while(char::is_ascii_digit).count();
    if (1..=9).contains(&digits) && matches!(&first_word[digits..], "." | ")") {
        return true;
    }

    // Fences, HTML blocks, thematic breaks and setext underlines.
    if text.starts_with("```") || text.starts_with("~~~") {
        return true;
    }
    if let Some(rest) = text.strip_prefix('<')
        && rest.starts_with(|c: char| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    {
        return true;
    }
    let rule = text.trim_end();
    !rule.is_empty()
        && ['-', '*', '_', '=']
            .into_iter()
            .any(|c| rule.chars().all(|r| r == c || r == ' '))
}

/// Pack the lines of `root` (a successful PARAGRAPH match).
///
/// `start_column` is how much of the current output line is already taken.
/// It counts towards the first merge decision but never appears in the output.
pub fn render(
    root: &SyntaxNode,
    margins: Margins,
    start_column: usize,
) -> Result<Rendered, ReflowError> {
    let mut lines: Vec<String> = Vec::new();
    // Width of the last committed line, including the starting column while
    // nothing has broken away from it.
    let mut last_width = start_column;
    let mut broke_before = false;

    for (i, line) in root.children().enumerate() {
        if line.kind() != SyntaxKind::SEMANTIC_LINE {
            return Err(ReflowError::StructuralInvariantViolation(format!(
                "expected SEMANTIC_LINE, found {:?}",
                line.kind()
            )));
        }

        let candidate = candidate(&line);
        let width = width(&candidate);
        let has_previous = i > 0 || start_column > 0;
        let fits = last_width < margins.min && last_width + width < margins.max;
        let merge = has_previous && (fits || opens_block(&candidate));

        match lines.last_mut() {
            Some(previous) if merge => previous.push_str(&candidate),
            _ if merge => lines.push(candidate),
            _ => {
                if i == 0 {
                    broke_before = start_column > 0;
                }
                lines.push(candidate);
                last_width = 0;
            }
        }
        last_width += width;
    }

    if lines.is_empty() {
        return Err(ReflowError::StructuralInvariantViolation(
            "match has no semantic lines".to_string(),
        ));
    }

    let last = lines.len() - 1;
    for line in &mut lines[..last] {
        line.truncate(line.trim_end().len());
    }

    Ok(Rendered {
        lines,
        broke_before,
    })
}
