//! # Grammar Rules
//!
//! This module contains the semantic line grammar. Each function takes a
//! `&mut Parser` and uses its methods to:
//!
//! 1. Inspect the current token (`p.current()`, `p.at()`, `p.nth()`)
//! 2. Consume tokens (`p.bump()`, `p.eat()`)
//! 3. Build tree structure (`p.start()` → marker → `complete()`/`abandon()`)
//! 4. Backtrack out of an alternative (`p.checkpoint()` → `p.rewind()`)
//!
//! ```text
//! Paragraph         = SemanticLine+
//! SemanticLine      = SemanticClause semanticBoundary
//! SemanticClause    = (Word | InlinePunctuation)+
//! semanticBoundary  = (semanticBreak | sentenceEnd) whitespace*
//! ```
//!
//! Unlike the rest of the grammar, rules here return `bool`: `true` when the
//! rule matched and consumed its input, `false` when it did not, in which case
//! the caller is expected to rewind. [`attempt`] wraps that pattern.
//!
//! ## Module Structure
//!
//! - [`word`] - `Word` and its ordered alternatives, inline punctuation
//! - [`boundary`] - semantic breaks and sentence ends
//!
//! ## Whitespace
//!
//! Whitespace between syntactic elements is skipped, but never dropped: it is
//! bumped into whichever node is open at the time, so the tree stays lossless.
//! A boundary owns the whitespace that follows it, which means every line
//! after the first starts directly with a word.

mod boundary;
mod word;

use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

/// Parse a whole run as a PARAGRAPH.
///
/// Returns `false` when the run is not a sequence of semantic lines. In that
/// case the lines that did match are kept and everything after them goes into
/// an ERROR node.
pub(super) fn paragraph(p: &mut Parser<'_, '_>) -> bool {
    let m = p.start();

    let mut lines = 0;
    while !p.at_end() && attempt(p, SyntaxKind::SEMANTIC_LINE, semantic_line) {
        lines += 1;
    }

    let matched = lines > 0 && p.at_end();
    if !matched {
        if lines == 0 {
            p.expected("a semantic line");
        }
        let error = p.start();
        while !p.at_end() {
            p.bump();
        }
        error.complete(p, SyntaxKind::ERROR);
    }

    m.complete(p, SyntaxKind::PARAGRAPH);
    matched
}

/// Run `rule` inside a node of `kind`, undoing everything if it fails.
pub(super) fn attempt(
    p: &mut Parser<'_, '_>,
    kind: SyntaxKind,
    rule: fn(&mut Parser<'_, '_>) -> bool,
) -> bool {
    let checkpoint = p.checkpoint();
    let m = p.start();
    if rule(p) {
        m.complete(p, kind);
        true
    } else {
        m.abandon(p);
        p.rewind(checkpoint);
        false
    }
}

fn semantic_line(p: &mut Parser<'_, '_>) -> bool {
    p.eat(SyntaxKind::WHITESPACE);
    if !attempt(p, SyntaxKind::SEMANTIC_CLAUSE, semantic_clause) {
        return false;
    }

    p.eat(SyntaxKind::WHITESPACE);
    if attempt(p, SyntaxKind::SEMANTIC_BOUNDARY, boundary::semantic_boundary) {
        true
    } else {
        p.expected("a semantic boundary");
        false
    }
}

fn semantic_clause(p: &mut Parser<'_, '_>) -> bool {
    if !clause_item(p) {
        p.expected("a word");
        return false;
    }

    loop {
        let checkpoint = p.checkpoint();
        p.eat(SyntaxKind::WHITESPACE);
        if !clause_item(p) {
            p.expected("a word, punctuation or a semantic boundary");
            p.rewind(checkpoint);
            return true;
        }
    }
}

fn clause_item(p: &mut Parser<'_, '_>) -> bool {
    word::word(p) || word::inline_punctuation(p)
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::syntax_kind::SyntaxKind;
    use pretty_assertions::assert_eq;

    fn line_texts(input: &str) -> Vec<String> {
        let result = parse(input);
        assert!(result.succeeded(), "{:?}", result.failure());
        result
            .root()
            .children()
            .map(|line| {
                assert_eq!(line.kind(), SyntaxKind::SEMANTIC_LINE);
                line.text().to_string()
            })
            .collect()
    }

    #[test]
    fn one_line_per_sentence() {
        assert_eq!(
            line_texts("Hello world! This is another sentence?"),
            vec!["Hello world! ", "This is another sentence?"]
        );
    }

    #[test]
    fn end_of_input_ends_a_sentence() {
        assert_eq!(line_texts("no punctuation at all"), vec!["no punctuation at all"]);
    }

    #[test]
    fn leading_whitespace_stays_on_first_line() {
        assert_eq!(line_texts(" and then. More"), vec![" and then. ", "More"]);
    }

    #[test]
    fn every_line_has_clause_and_boundary() {
        let result = parse("I start, I hesitate - I pause: then I dance.");
        for line in result.root().children() {
            let kinds: Vec<_> = line.children().map(|n| n.kind()).collect();
            assert_eq!(
                kinds,
                vec![SyntaxKind::SEMANTIC_CLAUSE, SyntaxKind::SEMANTIC_BOUNDARY]
            );
        }
        assert_eq!(result.root().children().count(), 3);
    }

    #[test]
    fn unknown_character_fails_the_run() {
        let result = parse("Costs 5 € per item.");
        assert!(!result.succeeded());
        assert_eq!(result.failure().unwrap().offset, "Costs 5 ".len());
        assert_eq!(result.root().text(), "Costs 5 € per item.");
    }

    #[test]
    fn whitespace_only_fails() {
        let result = parse("   ");
        assert!(!result.succeeded());
        assert_eq!(result.root().text(), "   ");
    }

    #[test]
    fn doubled_punctuation_is_one_sentence_end() {
        assert_eq!(
            line_texts("Wait... What?! Fine."),
            vec!["Wait... ", "What?! ", "Fine."]
        );
    }
}
