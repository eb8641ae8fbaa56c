//! Scanner states and transitions.

/// Tokenizer mode tag. Selects which compiled matcher runs. The tag space
/// is finite and fixed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StateTag {
    /// Ordinary code.
    Code,
    /// Inside a (possibly nested) comment.
    Comment,
}

/// Number of distinct state tags.
pub const STATE_TAG_COUNT: usize = 2;

impl StateTag {
    /// Dense index for per-tag matcher tables.
    pub fn index(self) -> usize {
        match self {
            StateTag::Code => 0,
            StateTag::Comment => 1,
        }
    }
}

/// Full scanner state: mode tag plus comment nesting depth, carried across
/// line boundaries by the line index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScanState {
    pub tag: StateTag,
    /// Comment nesting depth. Zero whenever `tag` is `Code`.
    pub depth: u32,
}

impl ScanState {
    /// The designated state at the start of a document.
    pub fn initial() -> Self {
        ScanState {
            tag: StateTag::Code,
            depth: 0,
        }
    }

    pub fn in_comment(&self) -> bool {
        self.tag == StateTag::Comment
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::initial()
    }
}

/// State transition attached to a matched rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// A nested-comment opener: increments depth, switching the tag to
    /// `Comment` when depth was zero.
    OpenComment,
    /// A nested-comment closer: decrements depth, reverting to `Code`
    /// only at depth zero. A stray closer in code is a no-op.
    CloseComment,
}

impl Transition {
    pub fn apply(self, state: ScanState) -> ScanState {
        match self {
            Transition::OpenComment => ScanState {
                tag: StateTag::Comment,
                depth: state.depth + 1,
            },
            Transition::CloseComment => {
                let depth = state.depth.saturating_sub(1);
                ScanState {
                    tag: if depth == 0 {
                        StateTag::Code
                    } else {
                        StateTag::Comment
                    },
                    depth,
                }
            }
        }
    }
}
