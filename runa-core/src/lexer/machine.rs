//! 词法自动机（下推自动机）
//!
//! 每次 `step` 从字符源读取一个字符，至多完成一次状态转移。
//! 状态离开时按角色操作匹配器，发射状态把令牌放入内部队列，
//! `next_token` 从队列中取出。

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::error::LexError;
use super::state::{LexGraph, LexRole};
use crate::kit::graph::{StateId, StateRef};
use crate::kit::matcher::RuneMatcher;
use crate::kit::ring_buffer::RingBuffer;
use crate::kit::source::{Rune, RuneSource, SourcePosition};
use crate::kit::token::Token;

const TARGET: &str = "runa::lexer";

/// 令牌队列容量（每步至多入队一个令牌）
const QUEUE_CAPACITY: usize = 2;

pub struct LexMachine<K, R> {
    source: RuneSource<R>,
    graph: Arc<LexGraph<K>>,
    matcher: RuneMatcher,
    queue: RingBuffer<Token<K>>,
    current: StateRef,
    last_consumed: Option<char>,
}

impl<K, R> LexMachine<K, R>
where
    K: Clone + fmt::Debug,
    R: Read,
{
    pub fn new(
        source: RuneSource<R>,
        graph: Arc<LexGraph<K>>,
        matcher: RuneMatcher,
    ) -> Result<Self, LexError> {
        let current = graph.start();
        Ok(Self {
            source,
            graph,
            matcher,
            queue: RingBuffer::new(QUEUE_CAPACITY)?,
            current,
            last_consumed: None,
        })
    }

    /// 当前状态为普通状态且不是结束状态时可以前进
    pub fn can_step(&self) -> bool {
        match self.current {
            StateRef::Normal(id) => self.graph.bounds().end != Some(id),
            StateRef::Accept | StateRef::Error => false,
        }
    }

    /// 是否正常结束
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

    /// 字符源游标位置
    pub fn position(&self) -> SourcePosition {
        self.source.position()
    }

    /// 前进一步；任何错误都会使机器进入 Error 状态
    pub fn step(&mut self) -> Result<(), LexError> {
        let StateRef::Normal(id) = self.current else {
            return Err(LexError::Halted);
        };
        if !self.can_step() {
            return Err(LexError::Halted);
        }

        match self.advance(id) {
            Ok(next) => {
                self.current = next;
                Ok(())
            }
            Err(err) => {
                warn!(target: TARGET, state = id, position = %self.source.position(), error = %err, "lexing step failed");
                self.current = StateRef::Error;
                Err(err)
            }
        }
    }

    fn advance(&mut self, id: StateId) -> Result<StateRef, LexError> {
        let rune = self.source.next()?;
        let (Some(state), Some(edge)) = (self.graph.state(id), self.graph.resolve(id, rune)) else {
            // 游标停在出错的字符上
            self.source.backup();
            return Err(LexError::InvalidTransition { state: id, rune });
        };
        let next = edge.target();
        trace!(target: TARGET, state = id, %rune, %next, role = %state.role, "step");

        match state.role {
            LexRole::Buffer => self.source.backup(),
            LexRole::Feeder => {}
            LexRole::Storer => {
                if let Some(c) = self.last_consumed {
                    if !self.matcher.store(c) {
                        return Err(LexError::UnregisteredCharacter {
                            state: id,
                            rune: Rune::Char(c),
                        });
                    }
                }
            }
            LexRole::Matcher => {
                if let Some(c) = self.last_consumed {
                    if !self.matcher.matches(c) {
                        return Err(LexError::UnmatchedCharacter {
                            state: id,
                            rune: Rune::Char(c),
                        });
                    }
                }
            }
        }

        if let Some(kind) = &state.emission {
            if state.role == LexRole::Buffer {
                return Err(LexError::UnsuitableEmission { state: id, rune });
            }
            if self.source.lexeme().is_empty() {
                trace!(target: TARGET, state = id, "skipping empty emission");
            } else {
                let token = self.source.emit(kind.clone());
                debug!(target: TARGET, lexeme = %token, kind = ?kind, span = %token.span.start, "emitted token");
                self.queue.push(token)?;
            }
        }

        self.last_consumed = rune.as_char();
        Ok(next)
    }

    /// 取下一个令牌
    ///
    /// 先取队列中已有的令牌，否则一直前进直到有令牌入队或无法前进。
    /// 无法前进时返回保留的词法结束令牌。
    pub fn next_token(&mut self) -> Result<Token<K>, LexError> {
        loop {
            if let Some(token) = self.queue.pop() {
                return Ok(token);
            }
            if !self.can_step() {
                return Ok(Token::end_of_lexing());
            }
            self.step()?;
        }
    }

    /// 令牌迭代器，在词法结束令牌或第一个错误之后停止
    pub fn tokens(&mut self) -> Tokens<'_, K, R> {
        Tokens {
            machine: self,
            done: false,
        }
    }

    /// 重置到起始状态，复用当前读取器
    pub fn reset(&mut self) {
        debug!(target: TARGET, "resetting lexing machine");
        self.source.reset();
        self.queue.clear();
        self.current = self.graph.start();
        self.last_consumed = None;
        self.matcher.reset();
    }

    /// 挂接新的读取器并重置，返回旧的读取器
    pub fn attach(&mut self, reader: R) -> R {
        let old = self.source.attach(reader);
        self.reset();
        old
    }
}

impl<K, R> fmt::Debug for LexMachine<K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexMachine")
            .field("current", &self.current)
            .field("last_consumed", &self.last_consumed)
            .field("matcher_depth", &self.matcher.depth())
            .field("queued", &self.queue.len())
            .finish()
    }
}

pub struct Tokens<'a, K, R> {
    machine: &'a mut LexMachine<K, R>,
    done: bool,
}

impl<K, R> Iterator for Tokens<'_, K, R>
where
    K: Clone + fmt::Debug,
    R: Read,
{
    type Item = Result<Token<K>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.machine.next_token();
        self.done = match &item {
            Ok(token) => token.is_end_of_lexing(),
            Err(_) => true,
        };
        Some(item)
    }
}
