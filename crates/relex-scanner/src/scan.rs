//! Scanner execution: run compiled matchers over text.

use relex_common::Span;

use crate::compile::{CompiledScanner, RuleAction, StateMatcher};
use crate::state::ScanState;
use crate::token::Token;

/// Scan `text` from the given starting state, producing the tokens found
/// and the state at the end of the text.
///
/// The cursor takes the leftmost match at or after its position; at equal
/// start positions a single-lexeme match beats a multi-lexeme one.
/// Zero-length matches are skipped without emitting a token, advancing the
/// cursor by one character. Scanning stops when the current state has no
/// matcher or no match remains.
pub fn scan(scanner: &CompiledScanner, start: ScanState, text: &str) -> (Vec<Token>, ScanState) {
    let mut tokens = Vec::new();
    let mut state = start;
    let mut pos = 0usize;

    while pos <= text.len() {
        let Some(matcher) = scanner.matcher(state.tag) else {
            break;
        };
        let Some((range, action)) = next_match(matcher, text, pos) else {
            break;
        };

        if range.0 == range.1 {
            // Zero-length match: emit nothing, but keep moving.
            match next_char_boundary(text, range.0) {
                Some(next) => {
                    pos = next;
                    continue;
                }
                None => break,
            }
        }

        tokens.push(Token::new(
            action.kind,
            Span::new(range.0 as u32, range.1 as u32),
        ));
        pos = range.1;

        if let Some(transition) = action.transition {
            state = transition.apply(state);
        }
    }

    (tokens, state)
}

/// Leftmost match at or after `pos`, with the tie-break contract applied.
fn next_match(matcher: &StateMatcher, text: &str, pos: usize) -> Option<((usize, usize), RuleAction)> {
    let single = matcher
        .singles
        .as_ref()
        .and_then(|re| re.find_at(text, pos))
        .and_then(|m| {
            matcher
                .single_action(m.as_str())
                .map(|action| ((m.start(), m.end()), action))
        });

    let multi = matcher.multis.as_ref().and_then(|re| {
        let caps = re.captures_at(text, pos)?;
        let overall = caps.get(0)?;
        // Resolve which alternative matched: the first participating
        // group, in declaration order.
        for (action, &group) in matcher.multi_actions.iter().zip(&matcher.multi_groups) {
            if caps.get(group).is_some() {
                return Some(((overall.start(), overall.end()), *action));
            }
        }
        None
    });

    match (single, multi) {
        (Some(s), Some(m)) => {
            // Single-lexeme wins ties at the same start position.
            if m.0.0 < s.0.0 { Some(m) } else { Some(s) }
        }
        (Some(s), None) => Some(s),
        (None, Some(m)) => Some(m),
        (None, None) => None,
    }
}

fn next_char_boundary(text: &str, pos: usize) -> Option<usize> {
    if pos >= text.len() {
        return None;
    }
    let mut next = pos + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    Some(next)
}
