//! Token categories and ranges produced by the scanner.

use relex_common::Span;
use serde::{Deserialize, Serialize};

/// Which bracket family a bracket token belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BracketKind {
    Paren,
    Square,
    Curly,
}

/// Identifier sub-classification.
///
/// `Plain` comes from the rule set's main identifier pattern; the other
/// flavors come from auxiliary flavored patterns, so a language
/// configuration only produces the flavors it declares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdentFlavor {
    Plain,
    /// Field/instance-variable style identifiers (e.g. `@name`).
    Field,
    /// Global-variable style identifiers (e.g. `$stdout`).
    Global,
}

/// Operator sub-classification.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorFlavor {
    /// Matched by the general operator pattern.
    Plain,
    /// One of the rule set's reserved operator lexemes.
    Reserved,
}

/// Token category. Closed set; languages use the subset their rules
/// describe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Open(BracketKind),
    Close(BracketKind),
    Str,
    Char,
    Number,
    /// Single-line comment marker. The covered extent (through end of
    /// line) is derived later, per line.
    LineComment,
    /// Nested comment opener.
    CommentOpen,
    /// Nested comment closer.
    CommentClose,
    Identifier(IdentFlavor),
    Operator(OperatorFlavor),
    Keyword,
    Regexp,
}

impl TokenKind {
    /// Whether this token is a comment delimiter of any sort.
    pub fn is_comment_marker(&self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::CommentOpen | TokenKind::CommentClose
        )
    }
}

/// A classified, range-tagged lexeme.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}
