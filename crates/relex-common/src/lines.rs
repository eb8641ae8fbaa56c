//! Line terminator handling.
//!
//! Splitting is shared between full line-index construction and the
//! re-split of an edited region, so it lives here rather than in the
//! index crate.

use memchr::memchr2;

use crate::limits::ESTIMATED_LINE_LEN;
use crate::span::Span;

/// Split `text` into line ranges.
///
/// Each range includes its trailing terminator (`\n`, `\r\n`, or a lone
/// `\r`). Always returns at least one range; text ending in a terminator
/// yields a final empty range, and empty text yields exactly one `[0,0)`
/// range.
pub fn line_ranges(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut ranges = Vec::with_capacity(text.len() / ESTIMATED_LINE_LEN + 1);
    let mut start = 0usize;

    let mut pos = 0usize;
    while let Some(found) = memchr2(b'\n', b'\r', &bytes[pos..]) {
        let at = pos + found;
        let term_len = if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
            2
        } else {
            1
        };
        let end = at + term_len;
        ranges.push(Span::new(start as u32, end as u32));
        start = end;
        pos = end;
    }

    ranges.push(Span::new(start as u32, text.len() as u32));
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(text: &str) -> Vec<(u32, u32)> {
        line_ranges(text).iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_single_line() {
        assert_eq!(pairs("abc"), vec![(0, 3)]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(pairs(""), vec![(0, 0)]);
    }

    #[test]
    fn test_three_lines() {
        assert_eq!(pairs("abc\ndefg\nhij"), vec![(0, 4), (4, 9), (9, 12)]);
    }

    #[test]
    fn test_trailing_terminator_yields_empty_line() {
        assert_eq!(pairs("abc\n"), vec![(0, 4), (4, 4)]);
    }

    #[test]
    fn test_crlf_and_lone_cr() {
        assert_eq!(pairs("a\r\nb\rc"), vec![(0, 3), (3, 5), (5, 6)]);
    }

    #[test]
    fn test_ranges_tile_the_text() {
        let text = "one\r\n\ntwo\rthree\n";
        let ranges = line_ranges(text);
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges.last().map(|s| s.end), Some(text.len() as u32));
        for window in ranges.windows(2) {
            assert_eq!(window[0].end, window[1].start);
        }
    }
}
