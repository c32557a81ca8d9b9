//! Runa Core - table-driven automata over character streams
//!
//! Contains the buffered rune source, the pushdown lexing automaton and
//! the tree-building parsing automaton. Only reads from `std::io::Read`,
//! no terminal output.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod grammars;
pub mod kit;
pub mod lexer;
pub mod parser;

// Re-export common types
pub use kit::{Rune, RuneMatcher, RuneSource, StateRef, Token, TokenKind};
pub use lexer::{LexError, LexMachine};
pub use parser::{ElementTree, ParseError, ParseMachine};

// Re-export config types from runa-config
pub use runa_config::{Phase, RunaConfig, SourceConfig};
