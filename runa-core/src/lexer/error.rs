//! 词法自动机错误类型

use thiserror::Error;

use crate::kit::graph::StateId;
use crate::kit::ring_buffer::RingBufferError;
use crate::kit::source::{Rune, SourceError};

/// 词法错误
///
/// 前四种都带有出错时所在的状态与相关字符。
#[derive(Debug, Error)]
pub enum LexError {
    #[error("no transition from state #{state} on {rune}")]
    InvalidTransition { state: StateId, rune: Rune },

    #[error("state #{state} cannot store unregistered character {rune}")]
    UnregisteredCharacter { state: StateId, rune: Rune },

    #[error("state #{state} found unmatched character {rune}")]
    UnmatchedCharacter { state: StateId, rune: Rune },

    #[error("buffer state #{state} cannot emit a token (on {rune})")]
    UnsuitableEmission { state: StateId, rune: Rune },

    /// 机器已失败或已结束，需要 `reset` 才能继续
    #[error("lexing machine halted, reset it before stepping again")]
    Halted,

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("token queue error: {0}")]
    Queue(#[from] RingBufferError),
}

impl LexError {
    /// 出错的状态（如果有）
    pub fn state(&self) -> Option<StateId> {
        match self {
            LexError::InvalidTransition { state, .. }
            | LexError::UnregisteredCharacter { state, .. }
            | LexError::UnmatchedCharacter { state, .. }
            | LexError::UnsuitableEmission { state, .. } => Some(*state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = LexError::InvalidTransition {
            state: 3,
            rune: Rune::Char('x'),
        };
        assert_eq!(err.to_string(), "no transition from state #3 on 'x'");
        assert_eq!(err.state(), Some(3));

        let err = LexError::UnmatchedCharacter {
            state: 1,
            rune: Rune::Eof,
        };
        assert!(err.to_string().contains("EOF"));
    }

    #[test]
    fn test_from_source_error() {
        let err: LexError = SourceError::LexemeOverflow { capacity: 8 }.into();
        assert!(matches!(err, LexError::Source(_)));
        assert_eq!(err.state(), None);
        assert!(err.to_string().contains("8 bytes"));
    }
}
