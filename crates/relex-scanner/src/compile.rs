//! Scanner compiler: lexical rule set to per-state matchers.
//!
//! For each state tag the applicable rules are partitioned into a
//! single-lexeme group (fixed or word-bounded strings, combined into one
//! alternation resolved by exact matched text) and a multi-lexeme group
//! (general patterns, combined into one regex with one capture group per
//! alternative in declaration order).

use regex::Regex;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::rules::LexicalRuleSet;
use crate::state::{STATE_TAG_COUNT, StateTag, Transition};
use crate::token::{BracketKind, IdentFlavor, OperatorFlavor, TokenKind};

/// Token category plus optional state transition for one matched rule.
#[derive(Copy, Clone, Debug)]
pub(crate) struct RuleAction {
    pub(crate) kind: TokenKind,
    pub(crate) transition: Option<Transition>,
}

impl RuleAction {
    fn plain(kind: TokenKind) -> Self {
        RuleAction {
            kind,
            transition: None,
        }
    }

    fn with_transition(kind: TokenKind, transition: Transition) -> Self {
        RuleAction {
            kind,
            transition: Some(transition),
        }
    }
}

/// A fixed lexeme rule before combination.
struct SingleLexeme {
    lexeme: String,
    /// Reserved identifiers match only at word boundaries.
    word_bounded: bool,
    /// Case-insensitive match and lookup (case-insensitive keyword sets).
    fold_case: bool,
    action: RuleAction,
}

/// Compiled matcher for one scanner state.
#[derive(Debug)]
pub(crate) struct StateMatcher {
    /// Alternation of fixed lexemes, longest first.
    pub(crate) singles: Option<Regex>,
    /// Exact matched text (case-folded where applicable) to action.
    pub(crate) single_actions: FxHashMap<String, RuleAction>,
    /// Whether the exact-text lookup falls back to a lowercased key.
    pub(crate) fold_case: bool,
    /// Alternation of general patterns, one named group per alternative.
    pub(crate) multis: Option<Regex>,
    /// Actions in declaration order, parallel to `multi_groups`.
    pub(crate) multi_actions: Vec<RuleAction>,
    /// Capture group index of each alternative in the combined regex.
    pub(crate) multi_groups: Vec<usize>,
}

impl StateMatcher {
    pub(crate) fn single_action(&self, matched: &str) -> Option<RuleAction> {
        if let Some(action) = self.single_actions.get(matched) {
            return Some(*action);
        }
        if self.fold_case {
            return self.single_actions.get(&matched.to_lowercase()).copied();
        }
        None
    }
}

/// Per-state matchers derived from a [`LexicalRuleSet`]. Immutable after
/// construction and safely shared read-only across documents of the same
/// language.
#[derive(Debug)]
pub struct CompiledScanner {
    matchers: [Option<StateMatcher>; STATE_TAG_COUNT],
}

impl CompiledScanner {
    pub(crate) fn matcher(&self, tag: StateTag) -> Option<&StateMatcher> {
        self.matchers[tag.index()].as_ref()
    }

    /// Whether any rules apply in the given state. A state without a
    /// matcher yields no further tokens when scanned.
    pub fn has_matcher(&self, tag: StateTag) -> bool {
        self.matchers[tag.index()].is_some()
    }
}

/// Rule set compilation failure. Raised once at language-configuration
/// construction; callers may degrade to [`LexicalRuleSet::plain_text`]
/// rather than failing the whole document.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("malformed pattern {pattern:?} in {state:?} state: {source}")]
    Pattern {
        state: StateTag,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Compile a lexical rule set into per-state matchers.
pub fn compile(rules: &LexicalRuleSet) -> Result<CompiledScanner, CompileError> {
    let code = build_state(StateTag::Code, code_singles(rules), code_multis(rules))?;
    let comment = build_state(StateTag::Comment, comment_singles(rules), Vec::new())?;

    debug!(
        language = %rules.name,
        code = code.is_some(),
        comment = comment.is_some(),
        "compiled scanner"
    );

    Ok(CompiledScanner {
        matchers: [code, comment],
    })
}

/// Fixed lexemes applicable in the code state, in declaration order.
fn code_singles(rules: &LexicalRuleSet) -> Vec<SingleLexeme> {
    let mut singles = Vec::new();
    let fixed = |lexeme: &str, action: RuleAction| SingleLexeme {
        lexeme: lexeme.to_string(),
        word_bounded: false,
        fold_case: false,
        action,
    };

    if rules.brackets.parens {
        singles.push(fixed("(", RuleAction::plain(TokenKind::Open(BracketKind::Paren))));
        singles.push(fixed(")", RuleAction::plain(TokenKind::Close(BracketKind::Paren))));
    }
    if rules.brackets.squares {
        singles.push(fixed("[", RuleAction::plain(TokenKind::Open(BracketKind::Square))));
        singles.push(fixed("]", RuleAction::plain(TokenKind::Close(BracketKind::Square))));
    }
    if rules.brackets.curlies {
        singles.push(fixed("{", RuleAction::plain(TokenKind::Open(BracketKind::Curly))));
        singles.push(fixed("}", RuleAction::plain(TokenKind::Close(BracketKind::Curly))));
    }

    if let Some(lexeme) = &rules.line_comment {
        singles.push(fixed(lexeme, RuleAction::plain(TokenKind::LineComment)));
    }
    if let Some((open, close)) = &rules.block_comment {
        singles.push(fixed(
            open,
            RuleAction::with_transition(TokenKind::CommentOpen, Transition::OpenComment),
        ));
        singles.push(fixed(
            close,
            RuleAction::with_transition(TokenKind::CommentClose, Transition::CloseComment),
        ));
    }

    for op in &rules.reserved_operators {
        singles.push(fixed(
            op,
            RuleAction::plain(TokenKind::Operator(OperatorFlavor::Reserved)),
        ));
    }

    for keyword in &rules.keywords {
        singles.push(SingleLexeme {
            lexeme: keyword.clone(),
            word_bounded: true,
            fold_case: !rules.keywords_case_sensitive,
            action: RuleAction::plain(TokenKind::Keyword),
        });
    }

    singles
}

/// General patterns applicable in the code state, in declaration order.
/// Declaration order is the tie-break for matches at the same position.
fn code_multis(rules: &LexicalRuleSet) -> Vec<(String, RuleAction)> {
    let mut multis = Vec::new();

    if let Some(pattern) = &rules.string_pattern {
        multis.push((pattern.clone(), RuleAction::plain(TokenKind::Str)));
    }
    if let Some(pattern) = &rules.char_pattern {
        multis.push((pattern.clone(), RuleAction::plain(TokenKind::Char)));
    }
    if let Some(pattern) = &rules.number_pattern {
        multis.push((pattern.clone(), RuleAction::plain(TokenKind::Number)));
    }
    if let Some(pattern) = &rules.regexp_pattern {
        multis.push((pattern.clone(), RuleAction::plain(TokenKind::Regexp)));
    }
    for (flavor, pattern) in &rules.flavored_idents {
        multis.push((
            pattern.clone(),
            RuleAction::plain(TokenKind::Identifier(*flavor)),
        ));
    }
    if let Some(pattern) = &rules.ident_pattern {
        multis.push((
            pattern.clone(),
            RuleAction::plain(TokenKind::Identifier(IdentFlavor::Plain)),
        ));
    }
    if let Some(pattern) = &rules.operator_pattern {
        multis.push((
            pattern.clone(),
            RuleAction::plain(TokenKind::Operator(OperatorFlavor::Plain)),
        ));
    }

    multis
}

/// The comment state only knows about the nested comment delimiters.
fn comment_singles(rules: &LexicalRuleSet) -> Vec<SingleLexeme> {
    let Some((open, close)) = &rules.block_comment else {
        return Vec::new();
    };
    vec![
        SingleLexeme {
            lexeme: open.clone(),
            word_bounded: false,
            fold_case: false,
            action: RuleAction::with_transition(TokenKind::CommentOpen, Transition::OpenComment),
        },
        SingleLexeme {
            lexeme: close.clone(),
            word_bounded: false,
            fold_case: false,
            action: RuleAction::with_transition(TokenKind::CommentClose, Transition::CloseComment),
        },
    ]
}

fn build_state(
    state: StateTag,
    singles: Vec<SingleLexeme>,
    multis: Vec<(String, RuleAction)>,
) -> Result<Option<StateMatcher>, CompileError> {
    if singles.is_empty() && multis.is_empty() {
        return Ok(None);
    }

    let (singles_regex, single_actions, fold_case) = build_singles(state, singles)?;
    let (multis_regex, multi_actions, multi_groups) = build_multis(state, multis)?;

    Ok(Some(StateMatcher {
        singles: singles_regex,
        single_actions,
        fold_case,
        multis: multis_regex,
        multi_actions,
        multi_groups,
    }))
}

fn build_singles(
    state: StateTag,
    mut singles: Vec<SingleLexeme>,
) -> Result<(Option<Regex>, FxHashMap<String, RuleAction>, bool), CompileError> {
    if singles.is_empty() {
        return Ok((None, FxHashMap::default(), false));
    }

    // Longest lexeme first, so e.g. a "//" line comment wins over a "/"
    // reserved operator at the same position.
    singles.sort_by_key(|s| std::cmp::Reverse(s.lexeme.len()));

    let mut actions = FxHashMap::default();
    let mut fold_case = false;
    let mut pieces = Vec::with_capacity(singles.len());

    for single in &singles {
        let mut piece = regex::escape(&single.lexeme);
        if single.word_bounded {
            piece = format!(r"\b(?:{piece})\b");
        }
        if single.fold_case {
            piece = format!("(?i:{piece})");
            fold_case = true;
            actions.insert(single.lexeme.to_lowercase(), single.action);
        } else {
            actions.insert(single.lexeme.clone(), single.action);
        }
        pieces.push(piece);
    }

    let pattern = pieces.join("|");
    let regex = Regex::new(&pattern).map_err(|source| CompileError::Pattern {
        state,
        pattern,
        source,
    })?;

    Ok((Some(regex), actions, fold_case))
}

fn build_multis(
    state: StateTag,
    multis: Vec<(String, RuleAction)>,
) -> Result<(Option<Regex>, Vec<RuleAction>, Vec<usize>), CompileError> {
    if multis.is_empty() {
        return Ok((None, Vec::new(), Vec::new()));
    }

    // Validate each alternative on its own first, so a malformed pattern
    // is reported precisely rather than as a failure of the combined
    // alternation.
    for (pattern, _) in &multis {
        Regex::new(pattern).map_err(|source| CompileError::Pattern {
            state,
            pattern: pattern.clone(),
            source,
        })?;
    }

    let pieces: Vec<String> = multis
        .iter()
        .enumerate()
        .map(|(i, (pattern, _))| format!("(?P<g{i}>{pattern})"))
        .collect();
    let pattern = pieces.join("|");
    let regex = Regex::new(&pattern).map_err(|source| CompileError::Pattern {
        state,
        pattern,
        source,
    })?;

    // Map each alternative to its capture group index in the combined
    // regex; user patterns may contain their own groups, shifting numeric
    // indices, so resolve by group name.
    let mut groups = Vec::with_capacity(multis.len());
    for i in 0..multis.len() {
        let name = format!("g{i}");
        let index = regex
            .capture_names()
            .position(|n| n == Some(name.as_str()))
            .unwrap_or(0);
        groups.push(index);
    }

    let actions = multis.into_iter().map(|(_, action)| action).collect();
    Ok((Some(regex), actions, groups))
}
