use std::fmt;

use crate::kit::graph::{Graph, GraphBuilder, StatePayload};

/// 状态离开时对匹配器的作用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexRole {
    /// 把刚读到的字符退回字符源
    Buffer,
    /// 无副作用
    Feeder,
    /// 把进入本状态的字符压入匹配器
    Storer,
    /// 用进入本状态的字符与匹配器栈顶配对
    Matcher,
}

impl fmt::Display for LexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LexRole::Buffer => "Buffer",
            LexRole::Feeder => "Feeder",
            LexRole::Storer => "Storer",
            LexRole::Matcher => "Matcher",
        };
        f.write_str(name)
    }
}

/// 词法状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexState<K> {
    pub role: LexRole,
    /// 离开时发射的令牌类型，None 表示不发射
    pub emission: Option<K>,
}

impl<K> LexState<K> {
    pub fn new(role: LexRole) -> Self {
        Self {
            role,
            emission: None,
        }
    }

    pub fn buffer() -> Self {
        Self::new(LexRole::Buffer)
    }

    pub fn feeder() -> Self {
        Self::new(LexRole::Feeder)
    }

    pub fn storer() -> Self {
        Self::new(LexRole::Storer)
    }

    pub fn matcher() -> Self {
        Self::new(LexRole::Matcher)
    }

    /// 离开时发射 `kind` 类型的令牌
    pub fn emitting(mut self, kind: K) -> Self {
        self.emission = Some(kind);
        self
    }

    pub fn is_emitter(&self) -> bool {
        self.emission.is_some()
    }
}

impl<K: fmt::Debug> fmt::Display for LexState<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.emission {
            Some(kind) => write!(f, "{kind:?}:[{}]", self.role),
            None => write!(f, "-:[{}]", self.role),
        }
    }
}

// Buffer 状态发射令牌在运行期报 UnsuitableEmission，这里不拦截
impl<K> StatePayload for LexState<K> {}

pub type LexGraph<K> = Graph<LexState<K>>;
pub type LexGraphBuilder<K> = GraphBuilder<LexState<K>>;
