//! Declarative lexical rule sets.
//!
//! A `LexicalRuleSet` describes one language's tokenization rules as data.
//! It is constructed once per language, compiled by [`crate::compile`],
//! and shared read-only afterwards. Rule sets are serde round-trippable so
//! hosts can ship language configurations as JSON.

use serde::{Deserialize, Serialize};

use crate::token::IdentFlavor;

/// Which bracket families the language treats as tokens.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSupport {
    #[serde(default)]
    pub parens: bool,
    #[serde(default)]
    pub squares: bool,
    #[serde(default)]
    pub curlies: bool,
}

impl BracketSupport {
    pub fn all() -> Self {
        BracketSupport {
            parens: true,
            squares: true,
            curlies: true,
        }
    }

    pub fn any(&self) -> bool {
        self.parens || self.squares || self.curlies
    }
}

/// Declarative description of a language's lexical rules.
///
/// Pattern fields hold regex source strings; lexeme fields hold fixed
/// text. All fields are optional except the name, so a rule set describes
/// only what the language actually has. Immutable once handed to
/// [`crate::compile`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalRuleSet {
    pub name: String,

    /// String literal pattern.
    #[serde(default)]
    pub string_pattern: Option<String>,
    /// Character literal pattern.
    #[serde(default)]
    pub char_pattern: Option<String>,
    /// Number literal pattern.
    #[serde(default)]
    pub number_pattern: Option<String>,
    /// Regexp literal pattern, for languages with first-class regexps.
    #[serde(default)]
    pub regexp_pattern: Option<String>,

    /// Single-line comment lexeme (e.g. `//`).
    #[serde(default)]
    pub line_comment: Option<String>,
    /// Nested-comment open/close lexeme pair (e.g. `/*`, `*/`).
    #[serde(default)]
    pub block_comment: Option<(String, String)>,

    /// Identifier pattern.
    #[serde(default)]
    pub ident_pattern: Option<String>,
    /// Auxiliary identifier patterns with a non-plain flavor, tried before
    /// the main identifier pattern in declaration order.
    #[serde(default)]
    pub flavored_idents: Vec<(IdentFlavor, String)>,

    /// Reserved identifiers, matched word-bounded.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Whether reserved identifiers match case-sensitively.
    #[serde(default = "default_true")]
    pub keywords_case_sensitive: bool,

    /// General operator pattern.
    #[serde(default)]
    pub operator_pattern: Option<String>,
    /// Reserved operator lexemes, matched exactly.
    #[serde(default)]
    pub reserved_operators: Vec<String>,

    #[serde(default)]
    pub brackets: BracketSupport,
}

fn default_true() -> bool {
    true
}

impl LexicalRuleSet {
    /// An empty rule set under `name`. Fields are filled in directly.
    pub fn named(name: impl Into<String>) -> Self {
        LexicalRuleSet {
            name: name.into(),
            keywords_case_sensitive: true,
            ..Default::default()
        }
    }

    /// A rule set with no rules at all. Compiles to a scanner that yields
    /// no tokens; the degradation target when a real rule set fails to
    /// compile.
    pub fn plain_text() -> Self {
        Self::named("plain-text")
    }
}
