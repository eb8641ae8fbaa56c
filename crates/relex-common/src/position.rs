//! Line/column positions.

use serde::{Deserialize, Serialize};

/// A position in a document (0-indexed line and column).
///
/// Columns count characters, not bytes, so hosts can hand positions
/// straight to their rendering layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 0-indexed line number
    pub line: u32,
    /// 0-indexed column (characters)
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}
