//! The inline node tree that the reflow works on.
//!
//! A small mdast-like model: every node has a type tag, an optional position
//! (synthetic nodes inserted by the reflow have none), and either children,
//! a literal value, or nothing.

use thiserror::Error;

/// A location in the source. Lines and columns are 1-based, columns count
/// `char`s, and `offset` is a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl Position {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Paragraph,
    Heading,
    Text,
    Strong,
    Emphasis,
    Delete,
    Image,
    Link,
    List,
    ListItem,
    Code,
    InlineCode,
    /// Frontmatter
    Yaml,
    BlockQuote,
    /// Hard line break
    Break,
    Html,
    Math,
    /// Anything else the Markdown parser produces (tables, rules, ...)
    Other,
}

impl NodeType {
    /// Nodes whose text must never be split across lines.
    pub fn is_unbreakable(self) -> bool {
        matches!(self, NodeType::Link | NodeType::InlineCode)
    }

    /// Inline wrappers the reflow descends into.
    pub fn is_inline_wrapper(self) -> bool {
        matches!(
            self,
            NodeType::Strong | NodeType::Emphasis | NodeType::Delete
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Parent(Vec<Node>),
    Literal(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeType,
    pub position: Option<Position>,
    pub content: Content,
}

impl Node {
    pub fn parent(kind: NodeType, position: Option<Position>, children: Vec<Node>) -> Self {
        Self {
            kind,
            position,
            content: Content::Parent(children),
        }
    }

    pub fn literal(kind: NodeType, position: Option<Position>, value: impl Into<String>) -> Self {
        Self {
            kind,
            position,
            content: Content::Literal(value.into()),
        }
    }

    pub fn leaf(kind: NodeType, position: Option<Position>) -> Self {
        Self {
            kind,
            position,
            content: Content::Empty,
        }
    }

    /// A Text node that does not come from the source.
    pub fn synthetic_text(value: impl Into<String>) -> Self {
        Self::literal(NodeType::Text, None, value)
    }

    /// Children, or an empty slice for non-parents.
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Parent(children) => children,
            _ => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.content {
            Content::Parent(children) => Some(children),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match &self.content {
            Content::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut String> {
        match &mut self.content {
            Content::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Depth-first iterator over this node and all its descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &Node> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LengthError {
    #[error("{kind:?} node spans lines {start_line}-{end_line} and has no literal value")]
    MultiLine {
        kind: NodeType,
        start_line: usize,
        end_line: usize,
    },
    #[error("{0:?} node has neither a position nor a literal value")]
    Unpositioned(NodeType),
}

/// Rendered width of a node, in columns.
///
/// Single-line nodes are measured from their position. Multi-line literals
/// fall back to the length of their value. Anything else cannot be measured.
pub fn node_length(node: &Node) -> Result<usize, LengthError> {
    match (node.position, node.value()) {
        (Some(position), _) if position.is_single_line() => {
            Ok(position.end.column.saturating_sub(position.start.column))
        }
        (_, Some(value)) => Ok(value.chars().count()),
        (Some(position), None) => Err(LengthError::MultiLine {
            kind: node.kind,
            start_line: position.start.line,
            end_line: position.end.line,
        }),
        (None, None) => Err(LengthError::Unpositioned(node.kind)),
    }
}
