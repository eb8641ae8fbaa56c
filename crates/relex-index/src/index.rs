//! Line index: ordered line spans tiling the document, with cached
//! per-line analysis.
//!
//! The span list is the single source of truth for line boundaries.
//! Invariant: spans exactly tile the document with no gaps or overlaps,
//! and at least one span always exists, even for empty text.

use relex_common::{Position, Span, limits::TOKENS_PER_LINE_INLINE, line_ranges};
use relex_scanner::{ScanState, Token};
use smallvec::SmallVec;

/// Token storage for one line. Inline for typical lines.
pub type TokenList = SmallVec<[Token; TOKENS_PER_LINE_INLINE]>;

/// Cached analysis for one line: tokens, comment-covering sub-ranges, and
/// the scanner state at end of line. All spans are line-relative.
#[derive(Clone, Debug, PartialEq)]
pub struct LineInfo {
    pub tokens: TokenList,
    /// Maximal coalesced comment extents within the line.
    pub comments: Vec<Span>,
    /// State to resume the next line with.
    pub end_state: ScanState,
}

/// One line of the document: a document-relative byte range (including the
/// trailing terminator, if present) plus optional cached analysis.
#[derive(Clone, Debug)]
pub struct LineSpan {
    pub start: u32,
    pub end: u32,
    /// Cached analysis; `None` until reconciled, cleared on invalidation.
    pub info: Option<LineInfo>,
    /// End state from before this line was invalidated. Lets
    /// reconciliation detect that an edit left the outgoing state
    /// unchanged and stop propagating.
    pub(crate) stale_end: Option<ScanState>,
}

impl LineSpan {
    fn new(range: Span) -> Self {
        LineSpan {
            start: range.start,
            end: range.end,
            info: None,
            stale_end: None,
        }
    }

    pub fn range(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// The line's text, terminator included.
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        self.range().text(document)
    }

    /// End state recorded for this line, cached or stale.
    pub(crate) fn known_end_state(&self) -> Option<ScanState> {
        self.info
            .as_ref()
            .map(|info| info.end_state)
            .or(self.stale_end)
    }
}

/// A document mutation as reported by the host text-storage layer: the
/// replaced range in the old text and the byte length of the replacement.
/// The replacement text itself is read out of the new full text.
#[derive(Copy, Clone, Debug)]
pub struct Edit {
    pub replaced: Span,
    pub inserted_len: u32,
}

impl Edit {
    pub fn new(replaced: Span, inserted_len: u32) -> Self {
        Edit {
            replaced,
            inserted_len,
        }
    }

    /// Signed change in document length.
    pub fn delta(&self) -> i64 {
        self.inserted_len as i64 - self.replaced.len() as i64
    }
}

/// What `update_after_edit` did to the span list. Drives reconciliation,
/// anchor shifting, and "does this edit touch line L" queries from the
/// diagnostics subsystem.
#[derive(Copy, Clone, Debug)]
pub struct EditOutcome {
    /// First re-split line (old and new indices coincide here).
    pub first_line: usize,
    /// Lines the re-split region covered in the old index.
    pub old_lines: usize,
    /// Lines the re-split region covers now.
    pub new_lines: usize,
}

impl EditOutcome {
    pub fn lines_inserted(&self) -> usize {
        self.new_lines.saturating_sub(self.old_lines)
    }

    pub fn lines_removed(&self) -> usize {
        self.old_lines.saturating_sub(self.new_lines)
    }

    /// Whether the edit touched the given line, in new line indices.
    pub fn touches_line(&self, line: usize) -> bool {
        line >= self.first_line && line < self.first_line + self.new_lines
    }
}

/// Ordered line spans over a document, with lazily computed per-line
/// analysis. One instance per open document.
#[derive(Clone, Debug)]
pub struct LineIndex {
    spans: Vec<LineSpan>,
}

impl LineIndex {
    /// Build an index over the full document text. All line info starts
    /// out empty; run reconciliation to populate it.
    pub fn new(text: &str) -> Self {
        let spans = line_ranges(text).into_iter().map(LineSpan::new).collect();
        LineIndex { spans }
    }

    pub fn line_count(&self) -> usize {
        self.spans.len()
    }

    /// Total document length implied by the span list.
    pub fn text_len(&self) -> u32 {
        self.spans.last().map(|s| s.end).unwrap_or(0)
    }

    /// The span of the given line, or `None` if the index is out of range.
    pub fn lookup(&self, line: usize) -> Option<&LineSpan> {
        self.spans.get(line)
    }

    pub(crate) fn spans_mut(&mut self) -> &mut [LineSpan] {
        &mut self.spans
    }

    /// The line containing `offset`.
    ///
    /// An offset at a span's upper bound belongs to the next span, except
    /// that an empty final span contains the offset equal to the document
    /// length. Out-of-range offsets return `None`.
    pub fn line_containing(&self, offset: u32) -> Option<usize> {
        let last = self.spans.last()?;
        if offset >= last.end {
            if last.is_empty_final() && offset == last.end {
                return Some(self.spans.len() - 1);
            }
            return None;
        }
        Some(self.spans.partition_point(|span| span.end <= offset))
    }

    /// Offset to line/column, counting columns in characters.
    pub fn position_of(&self, offset: u32, text: &str) -> Option<Position> {
        let line = self.line_containing(offset)?;
        let span = &self.spans[line];
        let slice = text.get(span.start as usize..offset as usize)?;
        Some(Position::new(line as u32, slice.chars().count() as u32))
    }

    /// Line/column to offset. Columns past the end of the line content
    /// clamp to the position before the terminator.
    pub fn offset_of(&self, position: Position, text: &str) -> Option<u32> {
        let span = self.lookup(position.line as usize)?;
        let slice = span.text(text);
        let mut offset = span.start;
        let mut column = 0u32;
        for ch in slice.chars() {
            if ch == '\n' || ch == '\r' || column == position.column {
                break;
            }
            offset += ch.len_utf8() as u32;
            column += 1;
        }
        Some(offset)
    }

    /// Apply a host edit to the span list.
    ///
    /// Only the region between the line containing the edit's start and
    /// the line containing its end is re-split; every later span is
    /// shifted by the length delta. Re-split lines lose their cached info
    /// (the last one keeps its prior end state as a stale hint); shifted
    /// lines keep theirs.
    pub fn update_after_edit(&mut self, new_text: &str, edit: &Edit) -> EditOutcome {
        let delta = edit.delta();
        let first = self.line_clamped(edit.replaced.start);
        let last_old = self.line_clamped(edit.replaced.end).max(first);

        let region_start = self.spans[first].start as usize;
        let stale = self.spans[last_old].known_end_state();

        let mut new_spans = self.resplit_region(new_text, region_start, last_old, delta);
        let new_lines = new_spans.len();
        if let Some(last_new) = new_spans.last_mut() {
            last_new.stale_end = stale;
        }

        let old_lines = last_old - first + 1;
        self.spans.splice(first..=last_old, new_spans);

        for span in &mut self.spans[first + new_lines..] {
            span.start = (span.start as i64 + delta) as u32;
            span.end = (span.end as i64 + delta) as u32;
        }

        self.debug_check_tiling(new_text);

        EditOutcome {
            first_line: first,
            old_lines,
            new_lines,
        }
    }

    /// Line for an edit endpoint; offsets at or past the end of the
    /// document land on the final line.
    fn line_clamped(&self, offset: u32) -> usize {
        self.line_containing(offset)
            .unwrap_or(self.spans.len() - 1)
    }

    fn resplit_region(
        &self,
        new_text: &str,
        region_start: usize,
        last_old: usize,
        delta: i64,
    ) -> Vec<LineSpan> {
        let last_is_final = last_old + 1 == self.spans.len();
        if last_is_final {
            // Through end of document; keeps the empty-final-span rule.
            return line_ranges(&new_text[region_start..])
                .into_iter()
                .map(|r| LineSpan::new(r.shifted(region_start as i64)))
                .collect();
        }

        // The old region ends just past a terminator, so it is still a
        // whole number of lines in the new text.
        let region_end = (self.spans[last_old].end as i64 + delta) as usize;
        let mut spans: Vec<LineSpan> = line_ranges(&new_text[region_start..region_end])
            .into_iter()
            .map(|r| LineSpan::new(r.shifted(region_start as i64)))
            .collect();
        // Drop the empty trailer: the next line already exists.
        if spans.len() > 1 && spans.last().is_some_and(|s| s.start == s.end) {
            spans.pop();
        }
        spans
    }

    fn debug_check_tiling(&self, text: &str) {
        debug_assert!(!self.spans.is_empty(), "line index lost its last span");
        debug_assert_eq!(self.spans[0].start, 0);
        debug_assert_eq!(
            self.text_len(),
            text.len() as u32,
            "line spans do not cover the document"
        );
        #[cfg(debug_assertions)]
        for pair in self.spans.windows(2) {
            assert_eq!(
                pair[0].end, pair[1].start,
                "gap or overlap between lines"
            );
        }
    }
}

impl LineSpan {
    fn is_empty_final(&self) -> bool {
        self.start == self.end
    }
}
