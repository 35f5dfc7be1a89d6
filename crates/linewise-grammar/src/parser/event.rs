//! # Parser Events
//!
//! Events are the intermediate representation between parsing and tree building.
//! Instead of building the tree directly, the parser emits a **flat sequence**
//! of events that describe the tree structure.
//!
//! ```text
//! Start(SEMANTIC_LINE)
//!   Start(SEMANTIC_CLAUSE)
//!     Start(WORD) Start(SINGLE_WORD) Token(ALNUM) Finish Finish
//!   Finish
//!   Start(SEMANTIC_BOUNDARY) ... Finish
//! Finish
//! ```
//!
//! A flat list is what makes backtracking cheap: trying an alternative and
//! giving up is just truncating the list back to a checkpoint. Nothing has
//! been committed to a tree yet.

use crate::syntax_kind::SyntaxKind;

/// An event emitted by the parser during tree construction.
///
/// Events form a flat representation of the tree that the [`Sink`](super::sink::Sink)
/// converts into an actual Rowan tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Begin a new composite node.
    Start { kind: SyntaxKind },

    /// Add a lexer token to the current node.
    Token { kind: SyntaxKind },

    /// Finish the current node.
    ///
    /// Must be paired with a preceding `Start`.
    Finish,

    /// A placeholder that will be replaced.
    ///
    /// When `parser.start()` is called, a `Placeholder` is pushed. Later,
    /// `marker.complete()` replaces it with a real `Start`, or
    /// `marker.abandon()` leaves it (the Sink ignores placeholders).
    Placeholder,
}

impl Event {
    /// Create a start event.
    pub fn start(kind: SyntaxKind) -> Self {
        Event::Start { kind }
    }

    /// Create a token event.
    pub fn token(kind: SyntaxKind) -> Self {
        Event::Token { kind }
    }
}
