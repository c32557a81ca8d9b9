//! 词法自动机
//!
//! 建立在 `RuneSource` 之上的确定性下推自动机：状态带有角色
//! （Buffer / Feeder / Storer / Matcher），可以在离开时发射令牌，
//! 通过 `RuneMatcher` 识别成对嵌套的符号。

pub mod error;
pub mod machine;
pub mod state;

pub use error::LexError;
pub use machine::{LexMachine, Tokens};
pub use state::{LexGraph, LexGraphBuilder, LexRole, LexState};
