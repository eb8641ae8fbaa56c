//! Common types and utilities for the relex incremental lexer.
//!
//! This crate provides foundational types used across all relex crates:
//! - Source spans (`Span`, byte offsets)
//! - Line/column positions (`Position`)
//! - Line terminator splitting (`line_ranges`)
//! - Capacity limits and thresholds

// Span - source ranges (byte offsets)
pub mod span;
pub use span::Span;

// Position - line/column source locations
pub mod position;
pub use position::Position;

// Line terminator handling
pub mod lines;
pub use lines::line_ranges;

// Centralized limits and thresholds
pub mod limits;
