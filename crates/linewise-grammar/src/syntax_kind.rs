//! SyntaxKind enum for all tokens and nodes in the semantic line CST.
//!
//! Following the rust-analyzer model, tokens and nodes share a single enum.
//! Every byte of the input run appears as a token in the tree.

/// All syntax kinds for the semantic line CST.
///
/// The `repr(u16)` ensures efficient storage in rowan's green tree.
/// We use SCREAMING_CASE following the rust-analyzer convention for SyntaxKind.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // === Tokens (lexer output) ===
    /// Spaces, tabs and line endings
    WHITESPACE,
    /// Run of letters and ASCII digits
    ALNUM,
    /// `.`
    PERIOD,
    /// `!`
    BANG,
    /// `?`
    QUESTION,
    /// `:`
    COLON,
    /// `;`
    SEMICOLON,
    /// `-`
    DASH,
    /// En dash or em dash
    LONG_DASH,
    /// `,`
    COMMA,
    /// Straight or curly double quote
    DOUBLE_QUOTE,
    /// Straight or curly single quote
    SINGLE_QUOTE,
    /// `(`
    LPAREN,
    /// `)`
    RPAREN,
    /// Opaque stand-in for an unbreakable span, see [`crate::placeholder`]
    PLACEHOLDER,
    /// Anything the grammar has no rule for
    UNKNOWN,
    /// End of input marker
    EOF,

    // === Composite Nodes (parser output) ===
    /// Root: one iteration of semantic lines
    PARAGRAPH,
    /// Clause followed by its boundary
    SEMANTIC_LINE,
    /// Words and inline punctuation
    SEMANTIC_CLAUSE,
    /// Punctuation that does not end a line
    INLINE_PUNCTUATION,
    /// A word, wrapping exactly one word subtype node
    WORD,
    /// `(letter|digit)+`
    SINGLE_WORD,
    /// `word-word`
    CONCATENATED_WORD,
    /// `word'letters`
    CONTRACTED_WORD,
    /// `(letter ".")+`, e.g. `e.g.`
    ACRONYM,
    /// A placeholder standing in for raw content
    RAW_CONTENT,
    /// Break or sentence end plus trailing whitespace
    SEMANTIC_BOUNDARY,
    /// Clause break: colon, semicolon, dashes, closing parenthesis
    SEMANTIC_BREAK,
    /// `.`, `!`, `?` or end of input
    SENTENCE_END,

    /// Unparsed remainder after a failed match
    ERROR,
}

impl SyntaxKind {
    /// Returns true if this kind represents a token (lexer output).
    pub fn is_token(self) -> bool {
        (self as u16) <= (Self::EOF as u16)
    }

    /// Returns true if this kind represents a composite node.
    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    /// Returns true if this kind is trivia.
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE)
    }

    /// Returns true for the subtype nodes that can sit inside a WORD.
    pub fn is_word_subtype(self) -> bool {
        matches!(
            self,
            Self::SINGLE_WORD
                | Self::CONCATENATED_WORD
                | Self::CONTRACTED_WORD
                | Self::ACRONYM
                | Self::RAW_CONTENT
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language definition for rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnglishLang {}

impl rowan::Language for EnglishLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::ERROR as u16);
        // SAFETY: We check bounds above and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type alias for our syntax nodes.
pub type SyntaxNode = rowan::SyntaxNode<EnglishLang>;
/// Type alias for our syntax tokens.
pub type SyntaxToken = rowan::SyntaxToken<EnglishLang>;
/// Type alias for syntax elements (node or token).
pub type SyntaxElement = rowan::SyntaxElement<EnglishLang>;
