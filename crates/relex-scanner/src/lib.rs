//! Rule-driven scanner for the relex incremental lexer.
//!
//! This crate provides the lexical analysis phase:
//! - `LexicalRuleSet` - Declarative token rules for one language
//! - `compile` - Rule set to per-state matcher compilation
//! - `ScanState` / `Transition` - Tokenizer state machine
//! - `scan` - Matcher execution over text

pub mod rules;
pub use rules::{BracketSupport, LexicalRuleSet};

pub mod token;
pub use token::{BracketKind, IdentFlavor, OperatorFlavor, Token, TokenKind};

pub mod state;
pub use state::{ScanState, StateTag, Transition};

pub mod compile;
pub use compile::{CompileError, CompiledScanner, compile};

pub mod scan;
pub use scan::scan;
