//! 自动机状态图
//!
//! 状态保存在以 `StateId` 为下标的 arena 中，边按字符索引，每个状态
//! 另有一条可选的默认边。图通过 `GraphBuilder` 一次性构建，之后只读，
//! 可以被多个机器实例共享。

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::source::Rune;

pub type StateId = usize;

/// 状态引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateRef {
    Normal(StateId),
    /// 正常接受（无需独立的结束状态）
    Accept,
    /// 失败，之后不能再前进
    Error,
}

impl fmt::Display for StateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateRef::Normal(id) => write!(f, "#{id}"),
            StateRef::Accept => write!(f, "<accept>"),
            StateRef::Error => write!(f, "<error>"),
        }
    }
}

/// 边的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Path {
    Rune(Rune),
    /// 没有精确匹配时使用
    Default,
}

impl Path {
    pub const EOF: Path = Path::Rune(Rune::Eof);
}

impl From<char> for Path {
    fn from(c: char) -> Self {
        Path::Rune(Rune::Char(c))
    }
}

impl From<Rune> for Path {
    fn from(rune: Rune) -> Self {
        Path::Rune(rune)
    }
}

/// 图的起止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: StateId,
    /// None 表示没有独立的结束状态，只能经由 `StateRef::Accept` 接受
    pub end: Option<StateId>,
}

/// 一次边解析的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Exact(StateRef),
    Fallback(StateRef),
}

impl Edge {
    pub fn target(&self) -> StateRef {
        match self {
            Edge::Exact(target) | Edge::Fallback(target) => *target,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Edge::Exact(_))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Invalid state ID: {0}")]
    InvalidStateId(StateId),

    #[error("State #{from} already has a path for {path:?}")]
    DuplicatePath { from: StateId, path: Path },

    #[error("Illegal state type {code:#06b}: {reason}")]
    IllegalStateType { code: u8, reason: &'static str },

    #[error("Graph has no states")]
    EmptyGraph,
}

/// 状态负载在加入图之前的校验
pub trait StatePayload {
    fn validate(&self) -> Result<(), GraphError> {
        Ok(())
    }
}

struct Node<S> {
    payload: S,
    edges: HashMap<Rune, StateRef>,
    fallback: Option<StateRef>,
}

/// 只读状态图
pub struct Graph<S> {
    nodes: Vec<Node<S>>,
    bounds: Bounds,
}

impl<S> Graph<S> {
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn start(&self) -> StateRef {
        StateRef::Normal(self.bounds.start)
    }

    pub fn state(&self, id: StateId) -> Option<&S> {
        self.nodes.get(id).map(|node| &node.payload)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 是否为结束状态（结束状态或 Accept）
    pub fn is_end(&self, state: StateRef) -> bool {
        match state {
            StateRef::Accept => true,
            StateRef::Normal(id) => self.bounds.end == Some(id),
            StateRef::Error => false,
        }
    }

    /// 先查精确边，再查默认边
    pub fn resolve(&self, id: StateId, rune: Rune) -> Option<Edge> {
        let node = self.nodes.get(id)?;
        if let Some(&target) = node.edges.get(&rune) {
            return Some(Edge::Exact(target));
        }
        node.fallback.map(Edge::Fallback)
    }
}

impl<S: fmt::Debug> fmt::Debug for Graph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("bounds", &self.bounds)
            .field("state_count", &self.nodes.len())
            .finish()
    }
}

/// 状态图构建器
pub struct GraphBuilder<S> {
    nodes: Vec<Node<S>>,
}

impl<S> Default for GraphBuilder<S> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<S: StatePayload> GraphBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加新状态，返回新状态ID
    pub fn add_state(&mut self, payload: S) -> Result<StateId, GraphError> {
        payload.validate()?;
        let id = self.nodes.len();
        self.nodes.push(Node {
            payload,
            edges: HashMap::new(),
            fallback: None,
        });
        Ok(id)
    }

    /// 添加一条边
    pub fn connect(
        &mut self,
        from: StateId,
        path: impl Into<Path>,
        to: StateRef,
    ) -> Result<(), GraphError> {
        let path = path.into();
        if let StateRef::Normal(id) = to {
            self.check_id(id)?;
        }
        let node = self
            .nodes
            .get_mut(from)
            .ok_or(GraphError::InvalidStateId(from))?;

        let slot = match path {
            Path::Rune(rune) => {
                if node.edges.contains_key(&rune) {
                    return Err(GraphError::DuplicatePath { from, path });
                }
                node.edges.insert(rune, to);
                return Ok(());
            }
            Path::Default => &mut node.fallback,
        };
        if slot.is_some() {
            return Err(GraphError::DuplicatePath { from, path });
        }
        *slot = Some(to);
        Ok(())
    }

    /// 连接两个普通状态
    pub fn link(
        &mut self,
        from: StateId,
        path: impl Into<Path>,
        to: StateId,
    ) -> Result<(), GraphError> {
        self.connect(from, path, StateRef::Normal(to))
    }

    pub fn build(self, start: StateId, end: Option<StateId>) -> Result<Graph<S>, GraphError> {
        if self.nodes.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        self.check_id(start)?;
        if let Some(end) = end {
            self.check_id(end)?;
        }
        Ok(Graph {
            nodes: self.nodes,
            bounds: Bounds { start, end },
        })
    }

    fn check_id(&self, id: StateId) -> Result<(), GraphError> {
        if id >= self.nodes.len() {
            return Err(GraphError::InvalidStateId(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Plain(&'static str);

    impl StatePayload for Plain {}

    #[derive(Debug)]
    struct Rejecting;

    impl StatePayload for Rejecting {
        fn validate(&self) -> Result<(), GraphError> {
            Err(GraphError::IllegalStateType {
                code: 0,
                reason: "always rejected",
            })
        }
    }

    #[test]
    fn test_resolve_exact_then_default() {
        let mut b = GraphBuilder::new();
        let s0 = b.add_state(Plain("s0")).unwrap();
        let s1 = b.add_state(Plain("s1")).unwrap();
        b.link(s0, 'a', s1).unwrap();
        b.connect(s0, Path::Default, StateRef::Accept).unwrap();
        b.connect(s1, Path::EOF, StateRef::Accept).unwrap();
        let g = b.build(s0, None).unwrap();

        assert_eq!(g.resolve(s0, Rune::Char('a')), Some(Edge::Exact(StateRef::Normal(s1))));
        assert_eq!(g.resolve(s0, Rune::Char('z')), Some(Edge::Fallback(StateRef::Accept)));
        assert_eq!(g.resolve(s1, Rune::Eof), Some(Edge::Exact(StateRef::Accept)));
        assert_eq!(g.resolve(s1, Rune::Char('a')), None);
        assert!(g.resolve(s0, Rune::Char('a')).is_some_and(|e| e.is_exact()));
        assert!(!g.resolve(s0, Rune::Char('z')).is_some_and(|e| e.is_exact()));
        assert_eq!(g.state(s1), Some(&Plain("s1")));
    }

    #[test]
    fn test_invalid_ids() {
        let mut b = GraphBuilder::new();
        let s0 = b.add_state(Plain("s0")).unwrap();
        assert_eq!(b.link(s0, 'a', 7), Err(GraphError::InvalidStateId(7)));
        assert_eq!(b.link(3, 'a', s0), Err(GraphError::InvalidStateId(3)));
        assert_eq!(b.build(s0, Some(9)).err(), Some(GraphError::InvalidStateId(9)));
    }

    #[test]
    fn test_duplicate_paths() {
        let mut b = GraphBuilder::new();
        let s0 = b.add_state(Plain("s0")).unwrap();
        b.link(s0, 'a', s0).unwrap();
        b.connect(s0, Path::Default, StateRef::Error).unwrap();
        assert!(matches!(
            b.link(s0, 'a', s0),
            Err(GraphError::DuplicatePath { .. })
        ));
        assert!(matches!(
            b.connect(s0, Path::Default, StateRef::Accept),
            Err(GraphError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn test_empty_graph() {
        let b: GraphBuilder<Plain> = GraphBuilder::new();
        assert_eq!(b.build(0, None).err(), Some(GraphError::EmptyGraph));
    }

    #[test]
    fn test_payload_validation() {
        let mut b = GraphBuilder::new();
        assert!(matches!(
            b.add_state(Rejecting),
            Err(GraphError::IllegalStateType { .. })
        ));
    }

    #[test]
    fn test_is_end() {
        let mut b = GraphBuilder::new();
        let s0 = b.add_state(Plain("s0")).unwrap();
        let s1 = b.add_state(Plain("s1")).unwrap();
        let g = b.build(s0, Some(s1)).unwrap();
        assert!(g.is_end(StateRef::Normal(s1)));
        assert!(g.is_end(StateRef::Accept));
        assert!(!g.is_end(StateRef::Normal(s0)));
        assert!(!g.is_end(StateRef::Error));
    }
}
