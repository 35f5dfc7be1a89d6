//! # linewise-grammar
//!
//! A semantic line grammar for prose, producing a lossless syntax tree using
//! [Rowan] + [Logos], following the [rust-analyzer] architecture model.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## What is a Semantic Line?
//!
//! A semantic line is a clause or sentence: a run of words that ends at a
//! natural pause. The grammar recognizes those pauses so that a formatter can
//! put line breaks where a reader would breathe, instead of wherever a column
//! limit happens to fall:
//!
//! ```text
//! "I start, I hesitate - I pause: then I dance."
//!
//! SEMANTIC_LINE  "I start, I hesitate - "
//! SEMANTIC_LINE  "I pause: "
//! SEMANTIC_LINE  "then I dance."
//! ```
//!
//! ## Architecture Overview
//!
//! ```text
//! Prose Run → Lexer → Tokens → Parser → Events → Sink → Rowan Tree
//!             (Logos)          (Grammar)        (GreenNodeBuilder)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! Tokenizes into letters-and-digits runs, whitespace, and single
//! punctuation marks. Every byte becomes part of some token.
//!
//! ### 2. Parser ([`parser`] module)
//!
//! Consumes tokens and emits **events**. The grammar is a PEG with ordered
//! choice, so the parser supports checkpoints and rewinding on top of the
//! usual marker system.
//!
//! ### 3. Sink ([`parser::sink`] module)
//!
//! Builds the Rowan green tree from the events.
//!
//! ## Module Structure
//!
//! ```text
//! linewise-grammar/
//! ├── lib.rs            # This file - public API and tree snapshot tests
//! ├── syntax_kind.rs    # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs          # Logos-based tokenizer
//! ├── placeholder.rs    # Markers for opaque spans inside a run
//! ├── cst.rs            # Structural tree helpers
//! └── parser/
//!     ├── mod.rs        # Parser, Marker, Checkpoint, MatchResult, parse()
//!     ├── event.rs      # Event enum (Start, Token, Finish, Placeholder)
//!     ├── sink.rs       # Converts events to Rowan GreenNode
//!     └── grammar/
//!         ├── mod.rs    # Paragraph, SemanticLine, SemanticClause
//!         ├── word.rs   # Word alternatives, inline punctuation
//!         └── boundary.rs # Semantic breaks, sentence ends
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use linewise_grammar::{parse, SyntaxKind};
//!
//! let result = parse("Hello world! This is another sentence?");
//! assert!(result.succeeded());
//!
//! let root = result.root();
//! assert_eq!(root.kind(), SyntaxKind::PARAGRAPH);
//! assert_eq!(root.text().to_string(), "Hello world! This is another sentence?");
//!
//! let lines: Vec<String> = root.children().map(|l| l.text().to_string()).collect();
//! assert_eq!(lines, ["Hello world! ", "This is another sentence?"]);
//! ```

pub mod cst;
pub mod lexer;
pub mod parser;
pub mod placeholder;
pub mod syntax_kind;

pub use parser::{MatchFailure, MatchResult, parse};
pub use syntax_kind::{EnglishLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    /// Helper to format a syntax tree for snapshot testing.
    fn format_tree(node: &SyntaxNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    let text = t.text().replace('\n', "\\n");
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        text
                    ));
                }
            }
        }

        result
    }

    #[test]
    fn snapshot_two_sentences() {
        let result = parse("Hello world! Bye?");
        assert_snapshot!(format_tree(result.root(), 0), @r#"
        PARAGRAPH@0..17
          SEMANTIC_LINE@0..13
            SEMANTIC_CLAUSE@0..11
              WORD@0..5
                SINGLE_WORD@0..5
                  ALNUM@0..5 "Hello"
              WHITESPACE@5..6 " "
              WORD@6..11
                SINGLE_WORD@6..11
                  ALNUM@6..11 "world"
            SEMANTIC_BOUNDARY@11..13
              SENTENCE_END@11..12
                BANG@11..12 "!"
              WHITESPACE@12..13 " "
          SEMANTIC_LINE@13..17
            SEMANTIC_CLAUSE@13..16
              WORD@13..16
                SINGLE_WORD@13..16
                  ALNUM@13..16 "Bye"
            SEMANTIC_BOUNDARY@16..17
              SENTENCE_END@16..17
                QUESTION@16..17 "?"
        "#);
    }

    #[test]
    fn snapshot_end_parens_and_contraction() {
        let result = parse("(it's) done");
        assert_snapshot!(format_tree(result.root(), 0), @r#"
        PARAGRAPH@0..11
          SEMANTIC_LINE@0..7
            SEMANTIC_CLAUSE@0..5
              INLINE_PUNCTUATION@0..1
                LPAREN@0..1 "("
              WORD@1..5
                CONTRACTED_WORD@1..5
                  ALNUM@1..3 "it"
                  SINGLE_QUOTE@3..4 "'"
                  ALNUM@4..5 "s"
            SEMANTIC_BOUNDARY@5..7
              SEMANTIC_BREAK@5..6
                RPAREN@5..6 ")"
              WHITESPACE@6..7 " "
          SEMANTIC_LINE@7..11
            SEMANTIC_CLAUSE@7..11
              WORD@7..11
                SINGLE_WORD@7..11
                  ALNUM@7..11 "done"
            SEMANTIC_BOUNDARY@11..11
              SENTENCE_END@11..11
        "#);
    }

    #[test]
    fn snapshot_failed_match() {
        let result = parse("Hi. 5%");
        assert_snapshot!(format_tree(result.root(), 0), @r#"
        PARAGRAPH@0..6
          SEMANTIC_LINE@0..4
            SEMANTIC_CLAUSE@0..2
              WORD@0..2
                SINGLE_WORD@0..2
                  ALNUM@0..2 "Hi"
            SEMANTIC_BOUNDARY@2..4
              SENTENCE_END@2..3
                PERIOD@2..3 "."
              WHITESPACE@3..4 " "
          ERROR@4..6
            ALNUM@4..5 "5"
            UNKNOWN@5..6 "%"
        "#);
        assert_snapshot!(result.failure().unwrap().to_string(), @r#"no semantic line match at offset 5: expected a word, punctuation or a semantic boundary, found "%""#);
    }

    #[test]
    fn scenario_sentences_are_lines() {
        let input = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                     Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. \
                     Ut enim ad minim veniam, quis nostrud exercitation ullamco laboris. \
                     Duis aute irure dolor in reprehenderit in voluptate velit esse.";
        let result = parse(input);
        assert!(result.succeeded());
        assert_eq!(result.root().children().count(), 4);
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "Hello, world!",
            "I start, I hesitate - I pause\u{2013}then I dance.",
            "  leading and trailing  ",
            "Some things, e.g. chicken",
            "broken ## input",
            "",
            "\u{FFF9}[link](url)\u{FFFB} and more.",
        ];

        for input in inputs {
            let result = parse(input);
            assert_eq!(
                result.root().text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
        }
    }
}
