//! 语法自动机
//!
//! 直接从字符源读取字符，维护一个部分构建的元素树栈：
//! 离开非终结状态时压入新节点，离开终结状态时把栈顶节点并入父节点。
//! 到达结束状态时，栈中唯一的节点就是完整的元素树。

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::element::ElementTree;
use super::error::ParseError;
use super::state::ParseGraph;
use crate::kit::graph::{StateId, StateRef};
use crate::kit::matcher::RuneMatcher;
use crate::kit::source::{Rune, RuneSource, SourcePosition};

const TARGET: &str = "runa::parser";

pub struct ParseMachine<K, R> {
    source: RuneSource<R>,
    graph: Arc<ParseGraph<K>>,
    matcher: RuneMatcher,
    stack: Vec<ElementTree<K>>,
    current: StateRef,
    last_state: StateId,
}

impl<K, R> ParseMachine<K, R>
where
    K: Clone + fmt::Debug,
    R: Read,
{
    pub fn new(source: RuneSource<R>, graph: Arc<ParseGraph<K>>, matcher: RuneMatcher) -> Self {
        let bounds = graph.bounds();
        Self {
            source,
            graph,
            matcher,
            stack: Vec::new(),
            current: StateRef::Normal(bounds.start),
            last_state: bounds.start,
        }
    }

    /// 未到结束状态、Accept 或 Error 时可以前进
    pub fn can_step(&self) -> bool {
        match self.current {
            StateRef::Normal(id) => self.graph.bounds().end != Some(id),
            StateRef::Accept | StateRef::Error => false,
        }
    }

    pub fn finished(&self) -> bool {
        self.graph.is_end(self.current)
    }

    pub fn is_matched(&self) -> bool {
        self.matcher.is_matched()
    }

    pub fn matcher(&self) -> &RuneMatcher {
        &self.matcher
    }

    pub fn current(&self) -> StateRef {
        self.current
    }

    /// 元素栈深度
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn position(&self) -> SourcePosition {
        self.source.position()
    }

    /// 前进一步；任何错误都会使机器进入 Error 状态
    pub fn step(&mut self) -> Result<(), ParseError> {
        let StateRef::Normal(id) = self.current else {
            return Err(ParseError::Halted);
        };
        if !self.can_step() {
            return Err(ParseError::Halted);
        }

        self.last_state = id;
        match self.advance(id) {
            Ok(next) => {
                self.current = next;
                Ok(())
            }
            Err(err) => {
                warn!(target: TARGET, state = id, position = %self.source.position(), error = %err, "parsing step failed");
                self.current = StateRef::Error;
                Err(err)
            }
        }
    }

    fn advance(&mut self, id: StateId) -> Result<StateRef, ParseError> {
        let rune = self.source.next()?;
        let graph = Arc::clone(&self.graph);
        let Some(state) = graph.state(id) else {
            return Err(ParseError::InvalidTransition { state: id, rune });
        };
        let st = state.state_type;

        let Some(edge) = graph.resolve(id, rune) else {
            self.source.backup();
            return Err(ParseError::InvalidTransition { state: id, rune });
        };
        let (next, consumed) = (edge.target(), edge.is_exact());
        trace!(target: TARGET, state = id, %rune, %next, flags = %st, consumed, "step");

        // 退回在发射之前，未消费的字符不会进入词素
        if !consumed || st.is_buffer {
            self.source.backup();
        }

        if !st.is_terminal {
            self.stack.push(ElementTree::new(state.element.clone()));
            debug!(target: TARGET, element = %state.element.name, depth = self.stack.len(), "pushed element");
            if st.is_matcher {
                let stored = rune.as_char().is_some_and(|c| self.matcher.store(c));
                if !stored {
                    return Err(ParseError::UnregisteredCharacter { state: id, rune });
                }
            }
        } else if !st.is_buffer {
            if st.is_matcher {
                let matched = rune.as_char().is_some_and(|c| self.matcher.matches(c));
                if !matched {
                    return Err(ParseError::UnmatchedCharacter { state: id, rune });
                }
            }
            self.fold()?;
        }

        if st.is_emitter {
            self.emit()?;
        }

        Ok(next)
    }

    /// 弹出栈顶节点，并入新的栈顶
    fn fold(&mut self) -> Result<(), ParseError> {
        let depth = self.stack.len();
        if depth < 2 {
            return Err(ParseError::UnbalancedTree { depth });
        }
        if let Some(child) = self.stack.pop() {
            debug!(target: TARGET, element = %child.element.name, depth = depth - 1, "folded element");
            if let Some(parent) = self.stack.last_mut() {
                parent.children.push(child);
            }
        }
        Ok(())
    }

    /// 把当前词素作为令牌追加到栈顶元素
    fn emit(&mut self) -> Result<(), ParseError> {
        let Some(top) = self.stack.last_mut() else {
            return Err(ParseError::UnbalancedTree { depth: 0 });
        };
        if self.source.lexeme().is_empty() {
            return Ok(());
        }
        let token = self.source.emit(top.element.kind.clone());
        debug!(target: TARGET, element = %top.element.name, lexeme = %token, "emitted token");
        top.element.tokens.push(token);
        Ok(())
    }

    fn check_complete(&self) -> Result<(), ParseError> {
        if self.current == StateRef::Error {
            return Err(ParseError::Failed);
        }
        if !self.finished() {
            return Err(ParseError::Incomplete);
        }
        if !self.matcher.is_matched() {
            return Err(ParseError::UnmatchedCharacter {
                state: self.last_state,
                rune: Rune::Eof,
            });
        }
        if self.stack.len() != 1 {
            return Err(ParseError::UnbalancedTree {
                depth: self.stack.len(),
            });
        }
        Ok(())
    }

    /// 正常结束后的完整元素树
    pub fn parsed_tree(&self) -> Result<&ElementTree<K>, ParseError> {
        self.check_complete()?;
        self.stack.last().ok_or(ParseError::UnbalancedTree { depth: 0 })
    }

    /// 前进到无法前进，然后取出元素树
    pub fn run(&mut self) -> Result<&ElementTree<K>, ParseError> {
        while self.can_step() {
            self.step()?;
        }
        self.parsed_tree()
    }

    pub fn into_tree(mut self) -> Result<ElementTree<K>, ParseError> {
        self.check_complete()?;
        self.stack.pop().ok_or(ParseError::UnbalancedTree { depth: 0 })
    }

    pub fn reset(&mut self) {
        debug!(target: TARGET, "resetting parsing machine");
        self.source.reset();
        self.stack.clear();
        let start = self.graph.bounds().start;
        self.current = StateRef::Normal(start);
        self.last_state = start;
        self.matcher.reset();
    }

    pub fn attach(&mut self, reader: R) -> R {
        let old = self.source.attach(reader);
        self.reset();
        old
    }
}

impl<K, R> fmt::Debug for ParseMachine<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseMachine")
            .field("current", &self.current)
            .field("stack_depth", &self.stack.len())
            .field("matcher_depth", &self.matcher.depth())
            .finish()
    }
}
