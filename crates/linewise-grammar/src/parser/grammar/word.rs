//! Words and inline punctuation.
//!
//! `Word` is an ordered choice. The first alternative that matches wins, even
//! if a later one would have consumed more:
//!
//! ```text
//! Word = rawContent | acronym | concatenatedWord | contractedWord | singleWord
//! ```
//!
//! The order is what keeps `e.g.` a single acronym instead of two one-letter
//! words each followed by a sentence end.

use super::attempt;
use crate::parser::Parser;
use crate::syntax_kind::SyntaxKind;

pub(super) fn word(p: &mut Parser<'_, '_>) -> bool {
    let m = p.start();
    let matched = attempt(p, SyntaxKind::RAW_CONTENT, raw_content)
        || attempt(p, SyntaxKind::ACRONYM, acronym)
        || attempt(p, SyntaxKind::CONCATENATED_WORD, concatenated_word)
        || attempt(p, SyntaxKind::CONTRACTED_WORD, contracted_word)
        || attempt(p, SyntaxKind::SINGLE_WORD, single_word);

    if matched {
        m.complete(p, SyntaxKind::WORD);
    } else {
        m.abandon(p);
    }
    matched
}

/// `,` `"` `'` `(` and a `)` that does not start an end-parens break.
pub(super) fn inline_punctuation(p: &mut Parser<'_, '_>) -> bool {
    let accepted = match p.current() {
        SyntaxKind::COMMA
        | SyntaxKind::DOUBLE_QUOTE
        | SyntaxKind::SINGLE_QUOTE
        | SyntaxKind::LPAREN => true,
        SyntaxKind::RPAREN => !matches!(p.nth(1), SyntaxKind::WHITESPACE | SyntaxKind::COMMA),
        _ => false,
    };
    if !accepted {
        return false;
    }

    let m = p.start();
    p.bump();
    m.complete(p, SyntaxKind::INLINE_PUNCTUATION);
    true
}

fn raw_content(p: &mut Parser<'_, '_>) -> bool {
    p.eat(SyntaxKind::PLACEHOLDER)
}

/// `(letter ".")+`
fn acronym(p: &mut Parser<'_, '_>) -> bool {
    let mut pieces = 0;
    while p.nth_token(0).is_some_and(|t| t.is_single_letter()) && p.nth(1) == SyntaxKind::PERIOD {
        p.bump();
        p.bump();
        pieces += 1;
    }
    pieces > 0
}

/// `singleWord ("-" singleWord)+`, so `state-of-the-art` stays whole.
fn concatenated_word(p: &mut Parser<'_, '_>) -> bool {
    if !(p.at(SyntaxKind::ALNUM) && p.nth(1) == SyntaxKind::DASH && p.nth(2) == SyntaxKind::ALNUM)
    {
        return false;
    }
    p.bump();
    while p.at(SyntaxKind::DASH) && p.nth(1) == SyntaxKind::ALNUM {
        p.bump();
        p.bump();
    }
    true
}

/// `singleWord "'" letter+`
fn contracted_word(p: &mut Parser<'_, '_>) -> bool {
    let contracted = p.at(SyntaxKind::ALNUM)
        && p.nth(1) == SyntaxKind::SINGLE_QUOTE
        && p.nth_token(2).is_some_and(|t| t.starts_with_letter());
    if contracted {
        p.bump();
        p.bump();
        p.bump();
    }
    contracted
}

fn single_word(p: &mut Parser<'_, '_>) -> bool {
    p.eat(SyntaxKind::ALNUM)
}

#[cfg(test)]
mod tests {
    use crate::parser::parse;
    use crate::syntax_kind::{SyntaxKind, SyntaxNode};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn words(input: &str) -> Vec<(SyntaxKind, String)> {
        let result = parse(input);
        assert!(result.succeeded(), "{:?}", result.failure());
        result
            .root()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::WORD)
            .filter_map(|w| w.first_child())
            .map(|subtype: SyntaxNode| (subtype.kind(), subtype.text().to_string()))
            .collect()
    }

    #[rstest]
    #[case("e.g.", SyntaxKind::ACRONYM)]
    #[case("U.S.A.", SyntaxKind::ACRONYM)]
    #[case("Heimer-Dinger", SyntaxKind::CONCATENATED_WORD)]
    #[case("state-of-the-art", SyntaxKind::CONCATENATED_WORD)]
    #[case("Robert's", SyntaxKind::CONTRACTED_WORD)]
    #[case("they\u{2019}re", SyntaxKind::CONTRACTED_WORD)]
    #[case("90's", SyntaxKind::CONTRACTED_WORD)]
    #[case("chicken", SyntaxKind::SINGLE_WORD)]
    #[case("2024", SyntaxKind::SINGLE_WORD)]
    #[case("\u{FFF9}[a link](url)\u{FFFB}", SyntaxKind::RAW_CONTENT)]
    fn single_word_kinds(#[case] input: &str, #[case] kind: SyntaxKind) {
        assert_eq!(words(input), vec![(kind, input.to_string())]);
    }

    #[test]
    fn acronym_is_not_a_sentence_end() {
        let result = parse("Some things, e.g. chicken");
        assert!(result.succeeded());
        assert_eq!(result.root().children().count(), 1);
        assert_eq!(
            words("Some things, e.g. chicken"),
            vec![
                (SyntaxKind::SINGLE_WORD, "Some".to_string()),
                (SyntaxKind::SINGLE_WORD, "things".to_string()),
                (SyntaxKind::ACRONYM, "e.g.".to_string()),
                (SyntaxKind::SINGLE_WORD, "chicken".to_string()),
            ]
        );
    }

    #[test]
    fn quote_not_followed_by_letter_is_punctuation() {
        let result = parse("the dogs' bowls");
        assert!(result.succeeded());
        let punctuation: Vec<_> = result
            .root()
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::INLINE_PUNCTUATION)
            .map(|n| n.text().to_string())
            .collect();
        assert_eq!(punctuation, vec!["'"]);
    }

    #[rstest]
    #[case("a (quiet) voice", 2)]
    #[case("it was (quietly)", 1)]
    #[case("said (quietly)!", 1)]
    fn closing_paren_inside_clause(#[case] input: &str, #[case] lines: usize) {
        let result = parse(input);
        assert!(result.succeeded());
        assert_eq!(result.root().children().count(), lines);
    }
}
