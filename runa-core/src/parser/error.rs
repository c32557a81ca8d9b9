//! 语法自动机错误类型

use thiserror::Error;

use crate::kit::graph::StateId;
use crate::kit::source::{Rune, SourceError};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no transition from state #{state} on {rune}")]
    InvalidTransition { state: StateId, rune: Rune },

    #[error("state #{state} cannot store unregistered character {rune}")]
    UnregisteredCharacter { state: StateId, rune: Rune },

    #[error("state #{state} found unmatched character {rune}")]
    UnmatchedCharacter { state: StateId, rune: Rune },

    /// `GraphBuilder` 拒绝 buffer 发射状态（`GraphError::IllegalStateType`），
    /// 因此经由 builder 构造的文法在运行期不会产生该错误
    #[error("state #{state} cannot emit a token (on {rune})")]
    UnsuitableEmission { state: StateId, rune: Rune },

    /// 元素栈与文法不一致（弹出时无父节点，或结束时不止一个节点）
    #[error("unbalanced element tree (stack depth {depth})")]
    UnbalancedTree { depth: usize },

    #[error("parsing has not reached an end state")]
    Incomplete,

    #[error("parsing failed, no tree available")]
    Failed,

    #[error("parsing machine halted, reset it before stepping again")]
    Halted,

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl ParseError {
    pub fn state(&self) -> Option<StateId> {
        match self {
            ParseError::InvalidTransition { state, .. }
            | ParseError::UnregisteredCharacter { state, .. }
            | ParseError::UnmatchedCharacter { state, .. }
            | ParseError::UnsuitableEmission { state, .. } => Some(*state),
            _ => None,
        }
    }
}
