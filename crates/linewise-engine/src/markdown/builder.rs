//! Builds a [`Node`] tree from pulldown-cmark's event stream.

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser, Tag};

use super::line_index::LineIndex;
use crate::ast::{Node, NodeType};

pub(super) fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TABLES
        | Options::ENABLE_MATH
        | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// A container that has been opened but not yet closed.
struct Frame {
    kind: NodeType,
    start: usize,
    children: Vec<Node>,
    /// Collected text for containers that become literal nodes.
    literal: Option<String>,
}

impl Frame {
    fn new(kind: NodeType, start: usize) -> Self {
        let literal = matches!(kind, NodeType::Code | NodeType::Yaml).then(String::new);
        Self {
            kind,
            start,
            children: Vec::new(),
            literal,
        }
    }
}

/// Text and soft breaks waiting to be merged into one Text node.
struct PendingText {
    start: usize,
    end: usize,
    value: String,
    /// Start of the source slice on the current line, if one is open.
    segment: Option<usize>,
}

pub(super) struct TreeBuilder<'a> {
    source: &'a str,
    index: LineIndex<'a>,
    stack: Vec<Frame>,
    pending: Option<PendingText>,
    /// Where the previous event's source range ended.
    last_end: usize,
}

impl<'a> TreeBuilder<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        Self {
            source,
            index: LineIndex::new(source),
            stack: vec![Frame::new(NodeType::Root, 0)],
            pending: None,
            last_end: 0,
        }
    }

    pub(super) fn build(mut self) -> Node {
        let parser = Parser::new_ext(self.source, options()).into_offset_iter();
        for (event, range) in parser {
            self.event(event, range);
        }

        self.flush_text();
        while self.stack.len() > 1 {
            let end = self.source.len();
            self.close(end);
        }
        let root = self.stack.pop().map(|f| f.children).unwrap_or_default();
        Node::parent(
            NodeType::Root,
            Some(self.index.position(0..self.source.len())),
            root,
        )
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        let end = match event {
            Event::Start(_) => range.start,
            _ => range.end,
        };
        self.dispatch(event, range);
        self.last_end = end;
    }

    fn dispatch(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                self.flush_text();
                self.stack.push(Frame::new(node_type(&tag), range.start));
            }
            Event::End(_) => {
                self.flush_text();
                self.close(range.end);
            }
            Event::Text(text) => {
                let top = self.stack.last_mut();
                match top {
                    Some(Frame {
                        literal: Some(literal),
                        ..
                    }) => literal.push_str(&text),
                    Some(Frame {
                        kind: NodeType::Image,
                        ..
                    }) => {}
                    _ => self.push_text(range),
                }
            }
            Event::SoftBreak => self.push_soft_break(range),
            Event::HardBreak => {
                let position = Some(self.index.position(range));
                self.push_node(Node::leaf(NodeType::Break, position));
            }
            Event::Code(code) => {
                let position = Some(self.index.position(range));
                self.push_node(Node::literal(NodeType::InlineCode, position, code.to_string()));
            }
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                let position = Some(self.index.position(range));
                self.push_node(Node::literal(NodeType::Math, position, math.to_string()));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                let position = Some(self.index.position(range));
                self.push_node(Node::literal(NodeType::Html, position, html.to_string()));
            }
            _ => {
                let position = Some(self.index.position(range));
                self.push_node(Node::leaf(NodeType::Other, position));
            }
        }
    }

    fn close(&mut self, end: usize) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let position = Some(self.index.position(frame.start..end));
        let node = match (frame.kind, frame.literal) {
            (kind, Some(value)) => Node::literal(kind, position, value),
            (NodeType::Image, None) => Node::leaf(NodeType::Image, position),
            (NodeType::ListItem, None) => {
                Node::parent(NodeType::ListItem, position, wrap_inline_runs(frame.children))
            }
            (kind, None) => Node::parent(kind, position, frame.children),
        };
        self.push_node(node);
    }

    fn push_node(&mut self, node: Node) {
        self.flush_text();
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn push_text(&mut self, range: Range<usize>) {
        let start = self.segment_start(range.start);
        let pending = self.pending.get_or_insert(PendingText {
            start,
            end: start,
            value: String::new(),
            segment: None,
        });
        if pending.segment.is_none() {
            pending.segment = Some(start);
        }
        pending.end = range.end;
    }

    fn push_soft_break(&mut self, range: Range<usize>) {
        let pending = self.pending.get_or_insert(PendingText {
            start: range.start,
            end: range.start,
            value: String::new(),
            segment: None,
        });
        if let Some(segment) = pending.segment.take() {
            pending.value.push_str(&self.source[segment..pending.end]);
        }
        pending.value.push('\n');
        pending.end = range.end;
    }

    /// A text event for an escaped character starts after its backslash, but
    /// the backslash belongs to the source slice. It is only claimed when no
    /// earlier event already covers it.
    fn segment_start(&self, start: usize) -> usize {
        let bytes = self.source.as_bytes();
        let escaped = start > self.last_end
            && bytes[start - 1] == b'\\'
            && bytes.get(start).is_some_and(u8::is_ascii_punctuation);
        if escaped { start - 1 } else { start }
    }

    fn flush_text(&mut self) {
        let Some(mut pending) = self.pending.take() else {
            return;
        };
        if let Some(segment) = pending.segment.take() {
            pending.value.push_str(&self.source[segment..pending.end]);
        }
        let position = Some(self.index.position(pending.start..pending.end));
        if let Some(frame) = self.stack.last_mut() {
            frame
                .children
                .push(Node::literal(NodeType::Text, position, pending.value));
        }
    }
}

fn node_type(tag: &Tag<'_>) -> NodeType {
    match tag {
        Tag::Paragraph => NodeType::Paragraph,
        Tag::Heading { .. } => NodeType::Heading,
        Tag::BlockQuote(_) => NodeType::BlockQuote,
        Tag::CodeBlock(_) => NodeType::Code,
        Tag::List(_) => NodeType::List,
        Tag::Item => NodeType::ListItem,
        Tag::Emphasis => NodeType::Emphasis,
        Tag::Strong => NodeType::Strong,
        Tag::Strikethrough => NodeType::Delete,
        Tag::Link { .. } => NodeType::Link,
        Tag::Image { .. } => NodeType::Image,
        Tag::MetadataBlock(_) => NodeType::Yaml,
        _ => NodeType::Other,
    }
}

fn is_inline(kind: NodeType) -> bool {
    matches!(
        kind,
        NodeType::Text
            | NodeType::Strong
            | NodeType::Emphasis
            | NodeType::Delete
            | NodeType::Link
            | NodeType::Image
            | NodeType::InlineCode
            | NodeType::Break
            | NodeType::Html
            | NodeType::Math
    )
}

/// Tight list items hold inline content directly; give each run a Paragraph.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut wrapped = Vec::with_capacity(children.len());
    let mut run: Vec<Node> = Vec::new();

    for child in children {
        if is_inline(child.kind) {
            run.push(child);
        } else {
            flush_run(&mut run, &mut wrapped);
            wrapped.push(child);
        }
    }
    flush_run(&mut run, &mut wrapped);
    wrapped
}

fn flush_run(run: &mut Vec<Node>, out: &mut Vec<Node>) {
    if run.is_empty() {
        return;
    }
    let start = run.iter().find_map(|n| n.position).map(|p| p.start);
    let end = run.iter().rev().find_map(|n| n.position).map(|p| p.end);
    let position = start.zip(end).map(|(start, end)| crate::ast::Position::new(start, end));
    out.push(Node::parent(NodeType::Paragraph, position, std::mem::take(run)));
}
