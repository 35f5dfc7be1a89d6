//! Semantic boundaries: where one semantic line ends and the next may start.

use super::attempt;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// `(semanticBreak | sentenceEnd) whitespace*`
pub(super) fn semantic_boundary(p: &mut Parser<'_, '_>) -> bool {
    let matched = attempt(p, SyntaxKind::SEMANTIC_BREAK, semantic_break)
        || attempt(p, SyntaxKind::SENTENCE_END, sentence_end);
    if matched {
        p.eat(SyntaxKind::WHITESPACE);
    }
    matched
}

/// Colon, semicolon, the dash family, or an end-parens `) ` / `),`.
fn semantic_break(p: &mut Parser<'_, '_>) -> bool {
    match p.current() {
        SyntaxKind::COLON | SyntaxKind::SEMICOLON | SyntaxKind::LONG_DASH => {
            p.bump();
            true
        }
        SyntaxKind::DASH => {
            p.bump();
            p.eat(SyntaxKind::DASH);
            true
        }
        SyntaxKind::RPAREN if matches!(p.nth(1), SyntaxKind::WHITESPACE | SyntaxKind::COMMA) => {
            p.bump();
            p.eat(SyntaxKind::COMMA);
            true
        }
        _ => false,
    }
}

/// A run of `.` `!` `?`, or the end of input (an empty node).
fn sentence_end(p: &mut Parser<'_, '_>) -> bool {
    if p.at_end() {
        return true;
    }

    let mut marks = 0;
    while matches!(
        p.current(),
        SyntaxKind::PERIOD | SyntaxKind::BANG | SyntaxKind::QUESTION
    ) {
        p.bump();
        marks += 1;
    }
    marks > 0
}
