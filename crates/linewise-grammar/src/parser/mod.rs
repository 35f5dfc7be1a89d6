//! # Parser - Event-Based Tree Construction
//!
//! This module implements the core parsing logic, transforming a token stream
//! into a syntax tree using the **event-based** architecture from rust-analyzer.
//!
//! Grammar functions never build tree nodes directly. They emit a flat list of
//! [`Event`]s that the [`Sink`] later turns into a Rowan tree. This matters for
//! the semantic line grammar because it is a PEG: `Word` is an *ordered choice*
//! (placeholder, acronym, concatenated, contracted, single word), and trying an
//! alternative that turns out not to match must leave no trace. With events,
//! undoing an attempt is [`Parser::rewind`] to a [`Checkpoint`].
//!
//! ## The Marker System
//!
//! When you call `parser.start()`, you get a [`Marker`]. It **must** be either:
//!
//! - Completed with `marker.complete(parser, KIND)` → emits Start+Finish
//! - Abandoned with `marker.abandon(parser)` → removes the placeholder
//!
//! Dropping a marker without doing either panics, which catches grammar bugs
//! before they produce corrupt trees.
//!
//! ```ignore
//! let m = parser.start();
//! parser.bump();
//! m.complete(parser, SyntaxKind::SEMANTIC_CLAUSE);
//! ```
//!
//! ## Failures
//!
//! A run that does not match is not an error in the Rust sense: [`parse`]
//! always returns a [`MatchResult`]. When the match fails, the result carries
//! the offset of the furthest point the grammar got to and what it expected
//! there, and the tree holds the unparsed rest in an `ERROR` node so that it
//! remains lossless.
//!
//! ```
//! use linewise_grammar::parse;
//!
//! let ok = parse("Hello world! This is another sentence?");
//! assert!(ok.succeeded());
//!
//! let bad = parse("Hello & goodbye.");
//! let failure = bad.failure().unwrap();
//! assert_eq!(failure.offset, 6);
//! assert_eq!(bad.root().text().to_string(), "Hello & goodbye.");
//! ```

pub mod event;
pub mod sink;

mod grammar;

use thiserror::Error;

use crate::lexer::{Token, lex};
use crate::syntax_kind::{SyntaxKind, SyntaxNode};
use event::Event;
use sink::Sink;

/// The parser state machine.
///
/// Holds the token stream, current position, and accumulated events.
/// Grammar functions receive `&mut Parser` and use its methods to:
///
/// - Inspect tokens: `current()`, `nth()`, `nth_token()`, `at()`, `at_end()`
/// - Consume tokens: `bump()`, `eat()`
/// - Build structure: `start()` → `Marker` → `complete()`/`abandon()`
/// - Backtrack: `checkpoint()` → `rewind()`
pub struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    pos: usize,
    events: Vec<Event>,
    /// Furthest token position at which a rule failed, and what it wanted.
    furthest: Option<(usize, &'static str)>,
}

/// A saved parser position that can be restored with [`Parser::rewind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pos: usize,
    events: usize,
}

impl<'t, 'input> Parser<'t, 'input> {
    /// Create a new parser from a slice of tokens.
    pub fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            furthest: None,
        }
    }

    /// Parse the tokens into a match result.
    pub fn parse(mut self) -> MatchResult {
        let matched = grammar::paragraph(&mut self);
        let failure = (!matched).then(|| self.failure());
        let root = Sink::new(self.tokens, self.events).finish();
        MatchResult { root, failure }
    }

    /// Start a new node and return a marker.
    pub fn start(&mut self) -> Marker {
        let pos = self.events.len();
        self.events.push(Event::Placeholder);
        Marker {
            pos,
            completed: false,
        }
    }

    /// Save the current position so an attempted rule can be undone.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            events: self.events.len(),
        }
    }

    /// Undo everything consumed and emitted since `checkpoint`.
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.pos;
        self.events.truncate(checkpoint.events);
    }

    /// Current token kind, or EOF if past end.
    pub fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Look ahead n tokens.
    pub fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map(|t| t.kind).unwrap_or(SyntaxKind::EOF)
    }

    /// Look ahead n tokens, with the token text.
    pub fn nth_token(&self, n: usize) -> Option<&Token<'input>> {
        self.tokens.get(self.pos + n)
    }

    /// Check if at end of input.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Check if current token is of given kind.
    pub fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Consume the current token if it matches.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consume the current token unconditionally.
    pub fn bump(&mut self) {
        if !self.at_end() {
            let kind = self.current();
            self.events.push(Event::token(kind));
            self.pos += 1;
        }
    }

    /// Record that a rule wanted `what` at the current position.
    ///
    /// Only the furthest position is kept, mirroring how PEG tools report the
    /// rightmost failure.
    pub fn expected(&mut self, what: &'static str) {
        match self.furthest {
            Some((pos, _)) if pos >= self.pos => {}
            _ => self.furthest = Some((self.pos, what)),
        }
    }

    fn failure(&self) -> MatchFailure {
        let (pos, what) = self.furthest.unwrap_or((self.pos, "end of input"));
        let offset = self.tokens[..pos.min(self.tokens.len())]
            .iter()
            .map(|t| t.text.len())
            .sum();
        let found = self
            .tokens
            .get(pos)
            .map_or_else(|| "end of input".to_string(), |t| format!("{:?}", t.text));
        MatchFailure {
            offset,
            message: format!("expected {what}, found {found}"),
        }
    }
}

/// A marker for a node being constructed.
///
/// When you call `parser.start()`, a `Placeholder` event is pushed and you get
/// a `Marker` pointing to it. It must be completed or abandoned; dropping it
/// otherwise panics.
#[must_use = "Markers must be completed or abandoned, dropping them is a bug"]
pub struct Marker {
    /// Position in the events vector where our Placeholder lives
    pos: usize,
    /// Tracks whether complete() or abandon() was called
    completed: bool,
}

impl Marker {
    /// Complete this marker, creating a node of the given kind.
    pub fn complete(mut self, p: &mut Parser<'_, '_>, kind: SyntaxKind) {
        self.completed = true;
        let event_at_pos = &mut p.events[self.pos];
        assert!(matches!(event_at_pos, Event::Placeholder));
        *event_at_pos = Event::start(kind);
        p.events.push(Event::Finish);
    }

    /// Abandon this marker without creating a node.
    ///
    /// Only removes the placeholder if it's the last event. Otherwise the
    /// placeholder becomes inert (the Sink ignores it) until a rewind drops it.
    pub fn abandon(mut self, p: &mut Parser<'_, '_>) {
        self.completed = true;
        if self.pos == p.events.len() - 1 {
            match p.events.pop() {
                Some(Event::Placeholder) => {}
                _ => unreachable!(),
            }
        }
    }
}

impl Drop for Marker {
    fn drop(&mut self) {
        if !self.completed && !std::thread::panicking() {
            panic!("Marker must be either completed or abandoned");
        }
    }
}

/// Why a run failed to match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no semantic line match at offset {offset}: {message}")]
pub struct MatchFailure {
    /// Byte offset into the input where matching could not continue.
    pub offset: usize,
    pub message: String,
}

/// Outcome of matching a run against the grammar.
///
/// The root is always present and always reproduces the input text; on
/// failure its tail is an `ERROR` node.
#[derive(Debug, Clone)]
pub struct MatchResult {
    root: SyntaxNode,
    failure: Option<MatchFailure>,
}

impl MatchResult {
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// The PARAGRAPH node.
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn failure(&self) -> Option<&MatchFailure> {
        self.failure.as_ref()
    }

    /// The tree if the run matched, the failure otherwise.
    pub fn into_result(self) -> Result<SyntaxNode, MatchFailure> {
        match self.failure {
            None => Ok(self.root),
            Some(failure) => Err(failure),
        }
    }
}

/// Match a flattened text run against the semantic line grammar.
pub fn parse(text: &str) -> MatchResult {
    let tokens = lex(text);
    let parser = Parser::new(&tokens);
    parser.parse()
}
