//! Location anchors: line/column references that track content across
//! whole-line insertions and removals.
//!
//! Anchors deliberately ignore intra-line churn. Hosts that need
//! character precision re-derive the column after reconciliation; the
//! anchor's job is to keep pointing at the right line.

use relex_common::Position;
use serde::{Deserialize, Serialize};

/// A sticky line/column reference into a document.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub line: u32,
    pub column: u32,
}

impl Anchor {
    pub fn new(line: u32, column: u32) -> Self {
        Anchor { line, column }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

impl From<Position> for Anchor {
    fn from(position: Position) -> Self {
        Anchor::new(position.line, position.column)
    }
}

/// Shift anchors after an edit at `edited_line` that inserted and removed
/// the given numbers of lines. Anchors on or above the edited line stay
/// put; anchors below move by the net line delta, floored at line 0.
pub fn follow_edit(
    anchors: &mut [Anchor],
    edited_line: u32,
    lines_inserted: u32,
    lines_removed: u32,
) {
    if lines_inserted == lines_removed {
        return;
    }
    let delta = lines_inserted as i64 - lines_removed as i64;
    for anchor in anchors.iter_mut() {
        if anchor.line > edited_line {
            anchor.line = (anchor.line as i64 + delta).max(0) as u32;
        }
    }
}
