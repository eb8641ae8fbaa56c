//! Centralized limits and thresholds for the relex crates.
//!
//! Centralizing these values prevents duplicate definitions with
//! inconsistent values and documents the rationale for each limit.

/// Inline capacity for per-line token lists.
///
/// Most source lines hold only a handful of tokens, so `SmallVec`-backed
/// storage with this inline capacity avoids a heap allocation per line in
/// the common case.
pub const TOKENS_PER_LINE_INLINE: usize = 8;

/// Estimated average line length in bytes.
///
/// Used to pre-size line span vectors when building an index from full
/// text, so typical documents need no reallocation during construction.
pub const ESTIMATED_LINE_LEN: usize = 32;
