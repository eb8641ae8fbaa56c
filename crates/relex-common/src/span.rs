//! Source spans (byte offsets).

use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, end)` in some text.
///
/// Spans produced by the scanner are relative to the text it was handed
/// (usually one line); spans stored in a line index are document-relative.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start position (byte offset)
    pub start: u32,
    /// End position (byte offset, exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span. `start` must not exceed `end`.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start {start} exceeds end {end}");
        Span { start, end }
    }

    /// An empty span at `offset`.
    pub fn empty(offset: u32) -> Self {
        Span {
            start: offset,
            end: offset,
        }
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `offset` falls inside the span. The end offset is excluded.
    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// The span moved by a signed byte delta.
    pub fn shifted(&self, delta: i64) -> Self {
        Span {
            start: (self.start as i64 + delta) as u32,
            end: (self.end as i64 + delta) as u32,
        }
    }

    /// Get the spanned text from source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start as usize;
        let end = self.end as usize;
        if end <= source.len() && start <= end {
            &source[start..end]
        } else {
            ""
        }
    }
}
