use std::fmt;

use super::element::Element;
use crate::kit::graph::{Graph, GraphBuilder, GraphError, StatePayload};

/// 状态类型：四个独立标志，可与 4 位编码互相转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StateType {
    pub is_matcher: bool,
    pub is_buffer: bool,
    pub is_terminal: bool,
    pub is_emitter: bool,
}

impl StateType {
    pub const MATCHER: u8 = 0x8;
    pub const BUFFER: u8 = 0x4;
    pub const TERMINAL: u8 = 0x2;
    pub const EMITTER: u8 = 0x1;

    /// 非终结状态：离开时压入新节点
    pub fn nonterminal() -> Self {
        Self::default()
    }

    /// 终结状态：离开时弹出节点并并入父节点
    pub fn terminal() -> Self {
        Self {
            is_terminal: true,
            ..Self::default()
        }
    }

    /// 缓冲状态：总是退回字符，不修改树
    pub fn buffer() -> Self {
        Self {
            is_buffer: true,
            is_terminal: true,
            ..Self::default()
        }
    }

    pub fn matching(mut self) -> Self {
        self.is_matcher = true;
        self
    }

    pub fn emitting(mut self) -> Self {
        self.is_emitter = true;
        self
    }

    /// 高于 0xF 的位被忽略
    pub fn decode(code: u8) -> Self {
        Self {
            is_matcher: code & Self::MATCHER != 0,
            is_buffer: code & Self::BUFFER != 0,
            is_terminal: code & Self::TERMINAL != 0,
            is_emitter: code & Self::EMITTER != 0,
        }
    }

    pub fn encode(&self) -> u8 {
        let mut code = 0;
        if self.is_matcher {
            code |= Self::MATCHER;
        }
        if self.is_buffer {
            code |= Self::BUFFER;
        }
        if self.is_terminal {
            code |= Self::TERMINAL;
        }
        if self.is_emitter {
            code |= Self::EMITTER;
        }
        code
    }

    /// 缓冲状态必须是终结状态，且不能发射或匹配
    pub fn validate(&self) -> Result<(), GraphError> {
        if !self.is_buffer {
            return Ok(());
        }
        let reason = if !self.is_terminal {
            "buffer state must be terminal"
        } else if self.is_emitter {
            "buffer state cannot emit"
        } else if self.is_matcher {
            "buffer state cannot match"
        } else {
            return Ok(());
        };
        Err(GraphError::IllegalStateType {
            code: self.encode(),
            reason,
        })
    }
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.is_matcher, 'M'),
            (self.is_buffer, 'B'),
            (self.is_terminal, 'T'),
            (self.is_emitter, 'E'),
        ];
        for (set, c) in flags {
            write!(f, "{}", if set { c } else { '-' })?;
        }
        Ok(())
    }
}

/// 语法状态：类型标志与用于创建新节点的默认元素
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseState<K> {
    pub state_type: StateType,
    pub element: Element<K>,
}

impl<K> ParseState<K> {
    pub fn new(state_type: StateType, element: Element<K>) -> Self {
        Self {
            state_type,
            element,
        }
    }
}

impl<K> StatePayload for ParseState<K> {
    fn validate(&self) -> Result<(), GraphError> {
        self.state_type.validate()
    }
}

pub type ParseGraph<K> = Graph<ParseState<K>>;
pub type ParseGraphBuilder<K> = GraphBuilder<ParseState<K>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_all_codes() {
        for code in 0u8..16 {
            assert_eq!(StateType::decode(code).encode(), code);
        }
        assert_eq!(StateType::decode(0xF3), StateType::decode(0x3));
    }

    #[test]
    fn test_bit_assignment() {
        let t = StateType::decode(0x9);
        assert!(t.is_matcher && t.is_emitter);
        assert!(!t.is_buffer && !t.is_terminal);
        assert_eq!(StateType::terminal().matching().emitting().encode(), 0xB);
        assert_eq!(StateType::buffer().encode(), 0x6);
    }

    #[test]
    fn test_only_terminal_plain_buffer_is_legal() {
        let legal: Vec<u8> = (0u8..16)
            .filter(|&c| c & StateType::BUFFER != 0)
            .filter(|&c| StateType::decode(c).validate().is_ok())
            .collect();
        assert_eq!(legal, [0x6]);
    }

    #[test]
    fn test_illegal_state_rejected_by_builder() {
        let mut b: ParseGraphBuilder<()> = ParseGraphBuilder::new();
        let illegal = ParseState::new(StateType::buffer().emitting(), Element::new("x", ()));
        assert!(matches!(
            b.add_state(illegal),
            Err(GraphError::IllegalStateType { code: 0x7, .. })
        ));
    }

    #[test]
    fn test_display_flags() {
        assert_eq!(StateType::buffer().to_string(), "-BT-");
        assert_eq!(StateType::nonterminal().matching().to_string(), "M---");
    }
}
