//! Writing a transformed tree back into its Markdown source.
//!
//! Only paragraphs are re-rendered. Everything else (headings, code, tables,
//! frontmatter, the markup between blocks) is copied from the source byte for
//! byte, so a paragraph the reflow did not touch cannot be disturbed by a
//! lossy round trip.

use super::MarkdownError;
use crate::ast::{Node, NodeType};

/// Replace every paragraph of `source` whose rendering changed in `tree`.
///
/// `tree` must come from parsing `source` (and then be transformed), so that
/// its paragraphs line up with a fresh parse.
pub fn stringify(source: &str, tree: &Node) -> Result<String, MarkdownError> {
    let baseline = super::parse(source);
    let before = paragraphs(&baseline);
    let after = paragraphs(tree);
    if before.len() != after.len() {
        return Err(MarkdownError::ParagraphCountMismatch {
            expected: before.len(),
            found: after.len(),
        });
    }

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for (original, changed) in before.into_iter().zip(after) {
        let Some((start, end)) = content_span(original) else {
            continue;
        };
        let prefix = continuation_prefix(source, start);
        let depth = quote_depth(&prefix);
        if !continuation_lines_match(&source[start..end], depth) {
            log::debug!("paragraph at byte {start} has lazy continuation lines, left as is");
            continue;
        }

        let old = render_inline(source, original.children(), depth);
        let new = render_inline(source, changed.children(), depth);
        if old == new {
            continue;
        }

        output.push_str(&source[cursor..start]);
        output.push_str(&new.replace('\n', &format!("\n{prefix}")));
        cursor = end;
    }
    output.push_str(&source[cursor..]);
    Ok(output)
}

fn paragraphs(tree: &Node) -> Vec<&Node> {
    tree.descendants()
        .filter(|node| node.kind == NodeType::Paragraph)
        .collect()
}

/// Byte range from the first to the last positioned inline node.
fn content_span(paragraph: &Node) -> Option<(usize, usize)> {
    let start = paragraph.children().iter().find_map(|n| n.position)?;
    let end = paragraph.children().iter().rev().find_map(|n| n.position)?;
    Some((start.start.offset, end.end.offset))
}

/// What continuation lines must start with to stay inside the paragraph's
/// containers: `>` markers are kept, list markers become spaces.
fn continuation_prefix(source: &str, start: usize) -> String {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    source[line_start..start]
        .chars()
        .map(|c| if c == '>' || c.is_whitespace() { c } else { ' ' })
        .collect()
}

fn quote_depth(prefix: &str) -> usize {
    prefix.chars().filter(|&c| c == '>').count()
}

/// Strip up to `depth` quote markers and the whitespace around them.
fn strip_container(line: &str, depth: usize) -> (&str, usize) {
    let mut seen = 0;
    let mut cut = line.len();
    for (i, c) in line.char_indices() {
        if c == '>' && seen < depth {
            seen += 1;
        } else if !c.is_whitespace() {
            cut = i;
            break;
        }
    }
    (&line[cut..], seen)
}

fn continuation_lines_match(text: &str, depth: usize) -> bool {
    text.split('\n')
        .skip(1)
        .all(|line| strip_container(line, depth).1 == depth)
}

/// Remove the container prefix from every continuation line of a slice.
fn dedent(slice: &str, depth: usize) -> String {
    let mut lines = slice.split('\n');
    let mut out = lines.next().unwrap_or_default().to_string();
    for line in lines {
        out.push('\n');
        out.push_str(strip_container(line, depth).0);
    }
    out
}

fn render_inline(source: &str, nodes: &[Node], depth: usize) -> String {
    let mut out = String::new();
    render_into(source, nodes, depth, &mut out);
    out
}

fn render_into(source: &str, nodes: &[Node], depth: usize, out: &mut String) {
    for node in nodes {
        match (node.kind, node.position) {
            (NodeType::Text, _) => out.push_str(node.value().unwrap_or_default()),
            (kind, Some(position)) if kind.is_inline_wrapper() => {
                let children = node.children();
                let inner_start = children.iter().find_map(|n| n.position);
                let inner_end = children.iter().rev().find_map(|n| n.position);
                match inner_start.zip(inner_end) {
                    Some((first, last)) => {
                        out.push_str(&source[position.start.offset..first.start.offset]);
                        render_into(source, children, depth, out);
                        out.push_str(&source[last.end.offset..position.end.offset]);
                    }
                    None => out.push_str(&dedent(
                        &source[position.start.offset..position.end.offset],
                        depth,
                    )),
                }
            }
            (_, Some(position)) => out.push_str(&dedent(
                &source[position.start.offset..position.end.offset],
                depth,
            )),
            (_, None) => out.push_str(node.value().unwrap_or_default()),
        }
    }
}
