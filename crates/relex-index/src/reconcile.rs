//! Reconciliation: bring a line index back up to date after an edit by
//! re-scanning the minimal run of lines.
//!
//! Starting at the first line with no cached info, lines are scanned with
//! the end state of the line above. Scanning continues past the dirty
//! region only while the incoming state differs from the state the next
//! line was last scanned with; the run stops as soon as the two agree,
//! because every cached result downstream is still valid then.

use relex_common::Span;
use relex_scanner::{CompiledScanner, ScanState, Token, TokenKind, scan};

use crate::index::{LineIndex, LineInfo, TokenList};

/// Re-scan every line whose cached analysis is missing or whose incoming
/// state changed. Idempotent: a fully reconciled index is untouched.
pub fn reconcile(index: &mut LineIndex, text: &str, scanner: &CompiledScanner) {
    let Some(first_dirty) = (0..index.line_count())
        .find(|&line| index.lookup(line).is_some_and(|s| s.info.is_none()))
    else {
        return;
    };

    let mut state = if first_dirty == 0 {
        ScanState::initial()
    } else {
        index
            .lookup(first_dirty - 1)
            .and_then(|s| s.info.as_ref())
            .map(|info| info.end_state)
            .unwrap_or_else(ScanState::initial)
    };

    let mut line = first_dirty;
    let mut rescanned = 0usize;
    // End state the previous line had before it was re-scanned. A clean
    // line was last scanned with exactly that state as its entry.
    let mut prev_old_end: Option<ScanState> = None;
    while line < index.line_count() {
        let span = &index.spans_mut()[line];
        if span.info.is_some() && prev_old_end == Some(state) {
            // Incoming state matches what this line was scanned with;
            // everything from here down is still valid.
            break;
        }
        let old_end = span.known_end_state();

        let line_text = Span::new(span.start, span.end).text(text);
        let line_len = (span.end - span.start) as usize;
        let entry_state = state;
        let (tokens, end_state) = scan(scanner, entry_state, line_text);
        let comments = comment_ranges(&tokens, entry_state, line_len as u32);

        let span = &mut index.spans_mut()[line];
        span.info = Some(LineInfo {
            tokens: TokenList::from_iter(tokens),
            comments,
            end_state,
        });
        span.stale_end = None;

        tracing::trace!(
            line,
            depth = end_state.depth,
            "rescanned line"
        );
        rescanned += 1;
        prev_old_end = old_end;
        state = end_state;
        line += 1;
    }

    if rescanned > 1 {
        tracing::debug!(first = first_dirty, count = rescanned, "state cascade");
    }
}

/// Derive the maximal comment extents of a line from its tokens and the
/// state it was scanned with. Ranges are line-relative and cover marker
/// tokens; a range still open at end of line runs to `line_len`.
fn comment_ranges(tokens: &[Token], entry: ScanState, line_len: u32) -> Vec<Span> {
    let mut ranges: Vec<Span> = Vec::new();
    let mut depth = entry.depth;
    // Resuming inside a block comment: the extent starts at column 0.
    let mut open_at = if entry.in_comment() { Some(0u32) } else { None };

    for token in tokens {
        match token.kind {
            TokenKind::LineComment => {
                if depth == 0 {
                    // Through end of line, terminator included.
                    push_range(&mut ranges, token.span.start, line_len);
                    return ranges;
                }
            }
            TokenKind::CommentOpen => {
                if depth == 0 {
                    open_at = Some(token.span.start);
                }
                depth += 1;
            }
            TokenKind::CommentClose => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    if let Some(start) = open_at.take() {
                        push_range(&mut ranges, start, token.span.end);
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(start) = open_at {
        push_range(&mut ranges, start, line_len);
    }
    ranges
}

/// Append a range, coalescing with the previous one when they touch.
fn push_range(ranges: &mut Vec<Span>, start: u32, end: u32) {
    if let Some(last) = ranges.last_mut() {
        if start <= last.end {
            last.end = last.end.max(end);
            return;
        }
    }
    ranges.push(Span::new(start, end));
}

#[cfg(test)]
mod tests {
    use super::*;
    use relex_scanner::{BracketSupport, LexicalRuleSet, StateTag, Transition, compile};

    fn demo_scanner() -> CompiledScanner {
        let mut rules = LexicalRuleSet::named("demo");
        rules.line_comment = Some("//".to_string());
        rules.block_comment = Some(("/*".to_string(), "*/".to_string()));
        rules.string_pattern = Some("\"[^\"\\n]*\"".to_string());
        rules.number_pattern = Some(r"\d+".to_string());
        rules.ident_pattern = Some(r"[A-Za-z_][A-Za-z0-9_]*".to_string());
        rules.keywords = vec!["let".to_string()];
        rules.reserved_operators = vec!["=".to_string()];
        rules.brackets = BracketSupport::all();
        compile(&rules).expect("demo rules compile")
    }

    fn reconciled(text: &str, scanner: &CompiledScanner) -> LineIndex {
        let mut index = LineIndex::new(text);
        reconcile(&mut index, text, scanner);
        index
    }

    fn end_states(index: &LineIndex) -> Vec<StateTag> {
        (0..index.line_count())
            .map(|i| index.lookup(i).unwrap().info.as_ref().unwrap().end_state.tag)
            .collect()
    }

    #[test]
    fn test_reconcile_populates_every_line() {
        let scanner = demo_scanner();
        let text = "let a = 1\nlet b = 2\n";
        let index = reconciled(text, &scanner);
        assert_eq!(index.line_count(), 3);
        for i in 0..3 {
            assert!(index.lookup(i).unwrap().info.is_some());
        }
        assert_eq!(
            end_states(&index),
            vec![StateTag::Code, StateTag::Code, StateTag::Code]
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let scanner = demo_scanner();
        let text = "let a = 1\n/* open\nstill in\n*/ done";
        let mut index = reconciled(text, &scanner);
        let before: Vec<_> = (0..index.line_count())
            .map(|i| index.lookup(i).unwrap().info.clone())
            .collect();
        reconcile(&mut index, text, &scanner);
        let after: Vec<_> = (0..index.line_count())
            .map(|i| index.lookup(i).unwrap().info.clone())
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_state_propagates_through_block_comment() {
        let scanner = demo_scanner();
        let text = "a /* b\nc\nd */ e";
        let index = reconciled(text, &scanner);
        assert_eq!(
            end_states(&index),
            vec![StateTag::Comment, StateTag::Comment, StateTag::Code]
        );
        // Middle line is pure comment interior: no tokens, full-width extent.
        let middle = index.lookup(1).unwrap().info.as_ref().unwrap();
        assert!(middle.tokens.is_empty());
        assert_eq!(middle.comments, vec![Span::new(0, 2)]);
    }

    #[test]
    fn test_line_comment_extent_runs_to_end_of_line() {
        let scanner = demo_scanner();
        let text = "let x = 1 // trailing\nnext";
        let index = reconciled(text, &scanner);
        let first = index.lookup(0).unwrap().info.as_ref().unwrap();
        assert_eq!(first.comments, vec![Span::new(10, 22)]);
    }

    #[test]
    fn test_block_comment_extent_within_line() {
        let scanner = demo_scanner();
        let text = "a /* b */ c /* d */";
        let index = reconciled(text, &scanner);
        let info = index.lookup(0).unwrap().info.as_ref().unwrap();
        assert_eq!(info.comments, vec![Span::new(2, 9), Span::new(12, 19)]);
    }

    #[test]
    fn test_nested_comment_yields_single_extent() {
        let scanner = demo_scanner();
        let text = "x /* a /* b */ c */ y";
        let index = reconciled(text, &scanner);
        let info = index.lookup(0).unwrap().info.as_ref().unwrap();
        assert_eq!(info.comments, vec![Span::new(2, 19)]);
        assert_eq!(info.end_state, ScanState::initial());
    }

    #[test]
    fn test_comment_ranges_from_resumed_state() {
        // Entering a line at depth 1: extent opens at column 0 and closes
        // at the close marker.
        let tokens = vec![Token::new(TokenKind::CommentClose, Span::new(3, 5))];
        let entry = Transition::OpenComment.apply(ScanState::initial());
        let ranges = comment_ranges(&tokens, entry, 10);
        assert_eq!(ranges, vec![Span::new(0, 5)]);
    }

    #[test]
    fn test_stray_close_in_code_has_no_extent() {
        let scanner = demo_scanner();
        let text = "a */ b";
        let index = reconciled(text, &scanner);
        let info = index.lookup(0).unwrap().info.as_ref().unwrap();
        assert!(info.comments.is_empty());
        assert_eq!(info.end_state, ScanState::initial());
    }

    #[test]
    fn test_edit_with_unchanged_state_rescans_one_line() {
        let scanner = demo_scanner();
        let original = "let a = 1\nlet b = 2\nlet c = 3";
        let mut index = reconciled(original, &scanner);

        // Replace "2" with "22" on the middle line.
        let edited = "let a = 1\nlet b = 22\nlet c = 3";
        let edit = crate::index::Edit::new(Span::new(18, 19), 2);
        index.update_after_edit(edited, &edit);

        let third_before = index.lookup(2).unwrap().info.clone();
        assert!(third_before.is_some(), "untouched line kept its cache");
        reconcile(&mut index, edited, &scanner);

        // The third line was never re-scanned; its cache is the same
        // object contents as before the edit.
        assert_eq!(index.lookup(2).unwrap().info, third_before);
        let middle = index.lookup(1).unwrap().info.as_ref().unwrap();
        assert_eq!(middle.tokens.len(), 4);
    }
}
