//! Reflowing one paragraph.
//!
//! The walk visits the paragraph's inline children depth-first, carrying the
//! [`LineState`] along. Consecutive Text, link and inline code siblings form a
//! run, which is reflowed as one piece:
//!
//! 1. Flatten the run. Text contributes its value; links and code spans become
//!    a [placeholder](linewise_grammar::placeholder) as wide as the node, so
//!    the grammar sees them as one opaque word.
//! 2. Match the flattened text and pack it with
//!    [`semantics::render`](super::semantics::render), starting at the running
//!    column.
//! 3. Place the forced breaks: a placeholder reached while the line is already
//!    past `min` moves to a new line, by breaking the whitespace in front of
//!    it or with a synthetic `"\n"` Text node.
//! 4. Hand the text between placeholders back to the run's Text nodes.
//!
//! Strong, emphasis and strikethrough are descended into. Text inside them is
//! not "plain": its first character is never turned into a line break.
//!
//! A run the grammar cannot match loses words from the front, one
//! whitespace-separated token at a time, until the rest matches. The dropped
//! words are kept exactly as written.

use linewise_grammar::{parse, placeholder};

use super::semantics;
use super::state::{Action, LineEvent, LineState, Phase};
use super::{Margins, ReflowError};
use crate::ast::{Node, NodeType, node_length};

/// Reflow `paragraph` in place.
///
/// Works on a copy of the children and only writes it back on success, so an
/// error leaves the paragraph exactly as it was.
pub fn reflow(paragraph: &mut Node, margins: Margins) -> Result<(), ReflowError> {
    let Some(children) = paragraph.children_mut() else {
        return Err(ReflowError::StructuralInvariantViolation(
            "paragraph has no children".to_string(),
        ));
    };

    let mut working = children.clone();
    let mut machine = ParagraphReflow::new(margins);
    machine.run(&mut working)?;
    *children = working;
    Ok(())
}

struct ParagraphReflow {
    margins: Margins,
    phase: Phase,
    line: LineState,
}

/// Nodes that take part in a flattened run.
fn in_run(kind: NodeType) -> bool {
    kind == NodeType::Text || kind.is_unbreakable()
}

impl ParagraphReflow {
    fn new(margins: Margins) -> Self {
        Self {
            margins,
            phase: Phase::Idle,
            line: LineState::AwaitingWord,
        }
    }

    fn run(&mut self, children: &mut Vec<Node>) -> Result<(), ReflowError> {
        self.phase = self.phase.advance(Phase::Accumulating)?;
        self.walk(children, true)?;
        self.phase = self.phase.advance(Phase::Committed)?;
        Ok(())
    }

    fn walk(&mut self, children: &mut Vec<Node>, plain: bool) -> Result<(), ReflowError> {
        let mut i = 0;
        while i < children.len() {
            let kind = children[i].kind;
            match kind {
                _ if in_run(kind) => {
                    i = self.text_run(children, i, plain)?;
                    continue;
                }
                NodeType::Break => {
                    self.step(LineEvent::Break);
                }
                NodeType::Image | NodeType::Html | NodeType::Math => {
                    let length = node_length(&children[i])?;
                    self.step(LineEvent::Atomic { length });
                }
                _ => {
                    if let Some(grandchildren) = children[i].children_mut() {
                        self.walk(grandchildren, false)?;
                    }
                }
            }
            i += 1;
        }
        Ok(())
    }

    fn step(&mut self, event: LineEvent) -> Action {
        let (line, action) = self.line.next(event, self.margins);
        self.line = line;
        action
    }

    /// Reflow the run starting at `start`. Returns the index just past it.
    fn text_run(
        &mut self,
        children: &mut Vec<Node>,
        start: usize,
        plain: bool,
    ) -> Result<usize, ReflowError> {
        self.phase = self.phase.advance(Phase::Rendering)?;
        let end = start
            + children[start..]
                .iter()
                .take_while(|node| in_run(node.kind))
                .count();

        let flattened = flatten(&children[start..end])?;
        let rendered = self.render_run(&flattened, plain)?;
        let placed = self.place_breaks(&rendered, start > 0);

        let tail = children.split_off(end);
        let run = children.split_off(start);
        children.extend(distribute(run, &placed)?);
        let next = children.len();
        children.extend(tail);

        self.phase = self.phase.advance(Phase::Accumulating)?;
        Ok(next)
    }

    /// Render one flattened run, starting at the running column.
    fn render_run(&self, value: &str, plain: bool) -> Result<String, ReflowError> {
        let start_column = self.line.column();
        let mut verbatim_end = 0;

        loop {
            let rest = &value[verbatim_end..];
            match parse(rest).into_result() {
                Ok(root) => {
                    let verbatim = &value[..verbatim_end];
                    let column = column_after(start_column, verbatim);
                    let rendered = semantics::render(&root, self.margins, column)?;

                    let mut text = rendered.text();
                    if rendered.broke_before && plain && text.starts_with(is_space) {
                        text = format!("\n{}", text.trim_start_matches(is_space));
                    }
                    return Ok(format!("{verbatim}{text}"));
                }
                Err(failure) => {
                    log::debug!("{failure} in {rest:?}, keeping the first word as is");
                    match skip_token(value, verbatim_end) {
                        Some(next) => verbatim_end = next,
                        None => return Ok(value.to_string()),
                    }
                }
            }
        }
    }

    /// Walk the rendered run through the line state, moving every placeholder
    /// that arrives past `min` onto a new line.
    ///
    /// `has_previous` says whether a sibling before the run can take a break.
    fn place_breaks(&mut self, rendered: &str, has_previous: bool) -> String {
        let mut out = String::with_capacity(rendered.len());
        let mut rest = rendered;

        while let Some((text, atom, after)) = next_placeholder(rest) {
            out.push_str(text);
            let column = column_after(self.line.column(), text);
            self.step(LineEvent::Text { column });

            let length = semantics::width(atom);
            let can_break = match out.chars().last() {
                None => has_previous,
                Some(c) => is_space(c) || c == placeholder::END,
            };
            if self.step(LineEvent::Unbreakable { length, can_break }) == Action::BreakBefore {
                log::trace!("breaking before a node of length {length}");
                let kept = out.trim_end_matches(is_space).len();
                out.truncate(kept);
                out.push('\n');
            }
            out.push_str(atom);
            rest = after;
        }

        out.push_str(rest);
        let column = column_after(self.line.column(), rest);
        self.step(LineEvent::Text { column });
        out
    }
}

/// The run's text with every unbreakable node replaced by a placeholder.
fn flatten(run: &[Node]) -> Result<String, ReflowError> {
    let mut flattened = String::new();
    for node in run {
        if node.kind != NodeType::Text {
            flattened.push_str(&placeholder::opaque(node_length(node)?));
            continue;
        }
        let Some(value) = node.value() else {
            return Err(ReflowError::StructuralInvariantViolation(
                "text node has no value".to_string(),
            ));
        };
        if placeholder::contains_marker(value) {
            return Err(ReflowError::StructuralInvariantViolation(
                "text contains placeholder markers".to_string(),
            ));
        }
        flattened.push_str(value);
    }
    Ok(flattened)
}

/// Split off the text before the next placeholder, the placeholder itself and
/// what follows it.
fn next_placeholder(text: &str) -> Option<(&str, &str, &str)> {
    let open = text.find(placeholder::START)?;
    let close = text[open..]
        .find(placeholder::END)
        .map_or(text.len(), |i| open + i + placeholder::END.len_utf8());
    Some((&text[..open], &text[open..close], &text[close..]))
}

/// Give the text between placeholders back to the run's nodes.
///
/// The first Text node of each gap takes the gap's text, later ones in the
/// same gap are emptied. A gap with text but no Text node gets a synthetic one.
fn distribute(run: Vec<Node>, placed: &str) -> Result<Vec<Node>, ReflowError> {
    let mut gaps = Vec::new();
    let mut rest = placed;
    while let Some((text, _, after)) = next_placeholder(rest) {
        gaps.push(text);
        rest = after;
    }
    gaps.push(rest);

    let atoms = run.iter().filter(|node| node.kind != NodeType::Text).count();
    if gaps.len() != atoms + 1 {
        return Err(ReflowError::StructuralInvariantViolation(format!(
            "{} placeholders rendered for {atoms} unbreakable nodes",
            gaps.len() - 1
        )));
    }

    let mut rebuilt = Vec::with_capacity(run.len() + 1);
    let mut gaps = gaps.into_iter();
    let mut gap = gaps.next();
    for mut node in run {
        if node.kind == NodeType::Text {
            let text = gap.take().unwrap_or_default();
            if let Some(value) = node.value_mut() {
                *value = text.to_string();
            }
            rebuilt.push(node);
            continue;
        }
        if let Some(text) = gap.take().filter(|text| !text.is_empty()) {
            rebuilt.push(Node::synthetic_text(text));
        }
        rebuilt.push(node);
        gap = gaps.next();
    }
    if let Some(text) = gap.filter(|text| !text.is_empty()) {
        rebuilt.push(Node::synthetic_text(text));
    }
    Ok(rebuilt)
}

fn is_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Column after writing `text` from `start`.
fn column_after(start: usize, text: &str) -> usize {
    match text.rfind('\n') {
        Some(i) => semantics::width(&text[i + 1..]),
        None => start + semantics::width(text),
    }
}

/// End of the first whitespace-delimited token at or after `from`.
fn skip_token(value: &str, from: usize) -> Option<usize> {
    let rest = &value[from..];
    let start = rest.find(|c: char| !is_space(c))?;
    let length = rest[start..].find(is_space).unwrap_or(rest.len() - start);
    Some(from + start + length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Point, Position};
    use pretty_assertions::assert_eq;

    const MARGINS: Margins = Margins::new(45, 80);

    fn text(value: &str) -> Node {
        Node::literal(NodeType::Text, None, value)
    }

    /// An unbreakable node on line 1 that is `length` columns wide.
    fn link(length: usize) -> Node {
        let point = |column| Point {
            line: 1,
            column,
            offset: 0,
        };
        Node::parent(
            NodeType::Link,
            Some(Position::new(point(1), point(1 + length))),
            vec![text("link text")],
        )
    }

    fn reflowed(children: Vec<Node>) -> Vec<Node> {
        let mut paragraph = Node::parent(NodeType::Paragraph, None, children);
        reflow(&mut paragraph, MARGINS).unwrap();
        paragraph.children().to_vec()
    }

    fn values(children: &[Node]) -> Vec<Option<&str>> {
        children.iter().map(|n| n.value()).collect()
    }

    const LEAD: &str = "Lorem ipsum dolor sit amet consectetur adipiscing ";

    #[test]
    fn breaks_before_link_past_min() {
        let children = reflowed(vec![
            text(LEAD),
            link(13),
            text(" in a rather long sentence, with more text."),
        ]);
        assert_eq!(
            values(&children),
            vec![
                Some("Lorem ipsum dolor sit amet consectetur adipiscing\n"),
                None,
                Some(" in a rather long sentence, with more text."),
            ]
        );
    }

    #[test]
    fn link_before_min_stays_on_line() {
        let input = vec![text("Short "), link(13), text(" here.")];
        assert_eq!(reflowed(input.clone()), input);
    }

    #[test]
    fn adjacent_links_get_a_synthetic_break() {
        let children = reflowed(vec![text("See "), link(50), link(10)]);
        assert_eq!(children.len(), 4);
        assert_eq!(children[2].value(), Some("\n"));
        assert_eq!(children[2].position, None);
        assert_eq!(children[3].kind, NodeType::Link);
    }

    #[test]
    fn glued_text_is_not_broken() {
        let input = vec![text("Lorem ipsum dolor sit amet consectetur adipiscing("), link(13)];
        assert_eq!(reflowed(input.clone()), input);
    }

    #[test]
    fn text_after_link_shares_its_line() {
        let input = vec![text("See "), link(44), text(" and then some more.")];
        assert_eq!(reflowed(input.clone()), input);
    }

    /// A code span standing in for `` `reflow` ``.
    fn code(length: usize) -> Node {
        let mut node = link(length);
        node.kind = NodeType::InlineCode;
        node
    }

    #[test]
    fn punctuation_after_code_is_matched() {
        let children = reflowed(vec![
            text("Call "),
            code(8),
            text(", and then check the output of the whole pipeline carefully. Then more words follow here."),
        ]);
        assert_eq!(
            values(&children),
            vec![
                Some("Call "),
                None,
                Some(", and then check the output of the whole pipeline carefully.\nThen more words follow here."),
            ]
        );
    }

    #[test]
    fn sentence_after_link_starts_a_line() {
        let children = reflowed(vec![
            text("Read "),
            link(36),
            text(". Next sentence with enough words to need a line of its own."),
        ]);
        assert_eq!(
            children[2].value(),
            Some(".\nNext sentence with enough words to need a line of its own.")
        );
    }

    #[test]
    fn text_with_markers_is_rejected() {
        let mut paragraph = Node::parent(
            NodeType::Paragraph,
            None,
            vec![text("odd \u{FFF9}marker"), link(5)],
        );
        assert!(matches!(
            reflow(&mut paragraph, MARGINS),
            Err(ReflowError::StructuralInvariantViolation(_))
        ));
    }

    #[test]
    fn text_inside_emphasis_never_breaks_first() {
        let children = reflowed(vec![
            text("See "),
            link(44),
            Node::parent(NodeType::Emphasis, None, vec![text(" odd spacing.")]),
        ]);
        assert_eq!(children[2].children()[0].value(), Some(" odd spacing."));
    }

    #[test]
    fn unparsable_prefix_is_kept_verbatim() {
        let children = reflowed(vec![text(
            "Costs 5 \u{20AC} per item. Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod.",
        )]);
        assert_eq!(
            values(&children),
            vec![Some(
                "Costs 5 \u{20AC} per item.\nLorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod."
            )]
        );
    }

    #[test]
    fn soft_break_between_links_is_unwrapped() {
        let children = reflowed(vec![link(5), text("\n"), link(5)]);
        assert_eq!(values(&children), vec![None, Some(" "), None]);
    }

    #[test]
    fn hard_break_resets_the_column() {
        let children = reflowed(vec![
            text(LEAD.trim_end()),
            Node::leaf(NodeType::Break, None),
            text("Next "),
            link(13),
        ]);
        assert_eq!(children[2].value(), Some("Next "));
    }

    #[test]
    fn failure_leaves_paragraph_untouched() {
        let unmeasurable = Node::parent(NodeType::Link, None, vec![]);
        let mut paragraph = Node::parent(
            NodeType::Paragraph,
            None,
            vec![text("One. Two."), unmeasurable],
        );
        let before = paragraph.clone();
        assert!(matches!(
            reflow(&mut paragraph, MARGINS),
            Err(ReflowError::LengthUnresolvable(_))
        ));
        assert_eq!(paragraph, before);
    }

    #[test]
    fn reflow_is_idempotent() {
        let input = vec![
            text(LEAD),
            link(13),
            text(" in a rather long sentence, with more text. And a second sentence that is long enough."),
        ];
        let once = reflowed(input);
        let twice = reflowed(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn skip_token_walks_words() {
        assert_eq!(skip_token("  ab cd", 0), Some(4));
        assert_eq!(skip_token("  ab cd", 4), Some(7));
        assert_eq!(skip_token("ab   ", 2), None);
    }
}
