//! Structural helpers over the parsed tree.
//!
//! Nothing here decides anything about line breaks; consumers attach their
//! own rendering on top.

use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Direct child nodes of `node` with the given kind, in order.
pub fn children_of_type(node: &SyntaxNode, kind: SyntaxKind) -> impl Iterator<Item = SyntaxNode> {
    node.children().filter(move |child| child.kind() == kind)
}

/// The exact source text covered by `node`.
pub fn source_text(node: &SyntaxNode) -> String {
    node.text().to_string()
}

/// The subtype of a WORD node (`SINGLE_WORD`, `ACRONYM`, ...).
///
/// Returns `None` for anything that is not a well-formed WORD.
pub fn word_kind(word: &SyntaxNode) -> Option<SyntaxKind> {
    if word.kind() != SyntaxKind::WORD {
        return None;
    }
    word.first_child()
        .map(|child| child.kind())
        .filter(|kind| kind.is_word_subtype())
}
