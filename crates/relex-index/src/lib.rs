//! Line index and edit reconciliation for the relex incremental lexer.
//!
//! This crate maintains the per-document state:
//! - `LineIndex` - Ordered line spans with cached per-line analysis
//! - `reconcile` - Minimal re-scan after an edit, with state propagation
//! - `Anchor` - Line/column references that survive line edits
//!
//! One `LineIndex` exists per open document, exclusively owned by the
//! thread driving that document's edits; teardown is dropping it.

pub mod index;
pub use index::{Edit, EditOutcome, LineIndex, LineInfo, LineSpan, TokenList};

pub mod reconcile;
pub use reconcile::reconcile;

pub mod anchor;
pub use anchor::{Anchor, follow_edit};
