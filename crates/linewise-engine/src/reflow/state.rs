//! The per-paragraph state machine.
//!
//! Two pieces of state live for exactly one paragraph:
//!
//! - [`Phase`]: where the paragraph is in its lifecycle.
//! - [`LineState`]: what the current output line looks like, which is all the
//!   walk needs to decide whether an unbreakable node must start a new line.
//!
//! ```text
//!                 Text{column} / Atomic{length}
//!  AwaitingWord ──────────────────────────────▶ InSentence{column}  (column <= min)
//!       ▲                                      AtBoundary{column}  (column >  min)
//!       │ Break
//!       └──────────── any state
//!
//!  AtBoundary ── Unbreakable{length, can_break} ──▶ BreakBefore, column = length
//! ```

use super::{Margins, ReflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Walking inline children.
    Accumulating,
    /// Rendering one text run.
    Rendering,
    Committed,
}

impl Phase {
    /// Move to `next`, rejecting transitions the walk never makes.
    pub fn advance(self, next: Phase) -> Result<Phase, ReflowError> {
        use Phase::*;
        match (self, next) {
            (Idle, Accumulating)
            | (Accumulating, Rendering)
            | (Rendering, Accumulating)
            | (Accumulating, Committed) => Ok(next),
            _ => Err(ReflowError::StructuralInvariantViolation(format!(
                "illegal phase transition {self:?} -> {next:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Nothing on the current line yet.
    AwaitingWord,
    InSentence { column: usize },
    /// Past `min`: the next unbreakable node goes on a new line.
    AtBoundary { column: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent {
    /// A text run was rendered and the line now ends at `column`.
    Text { column: usize },
    /// An atomic node that is never moved (image, inline HTML, math).
    Atomic { length: usize },
    /// A link or code span. `can_break` says whether a break before it can be
    /// written into the tree.
    Unbreakable { length: usize, can_break: bool },
    /// A hard line break.
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Start a new line before the node.
    BreakBefore,
}

impl LineState {
    fn at(column: usize, margins: Margins) -> Self {
        match column {
            0 => LineState::AwaitingWord,
            c if c > margins.min => LineState::AtBoundary { column: c },
            c => LineState::InSentence { column: c },
        }
    }

    pub fn column(self) -> usize {
        match self {
            LineState::AwaitingWord => 0,
            LineState::InSentence { column } | LineState::AtBoundary { column } => column,
        }
    }

    /// The transition table.
    pub fn next(self, event: LineEvent, margins: Margins) -> (LineState, Action) {
        match (self, event) {
            (_, LineEvent::Break) => (LineState::AwaitingWord, Action::None),
            (_, LineEvent::Text { column }) => (LineState::at(column, margins), Action::None),
            (state, LineEvent::Atomic { length }) => {
                (LineState::at(state.column() + length, margins), Action::None)
            }
            (
                LineState::AtBoundary { .. },
                LineEvent::Unbreakable {
                    length,
                    can_break: true,
                },
            ) => (LineState::at(length, margins), Action::BreakBefore),
            (state, LineEvent::Unbreakable { length, .. }) => {
                (LineState::at(state.column() + length, margins), Action::None)
            }
        }
    }
}
