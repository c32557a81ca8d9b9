//! 自动机工具箱：字符源、配对匹配器、状态图与令牌队列

pub mod graph;
pub mod matcher;
pub mod ring_buffer;
pub mod source;
pub mod token;

pub use graph::{Bounds, Edge, Graph, GraphBuilder, GraphError, Path, StateId, StatePayload, StateRef};
pub use matcher::RuneMatcher;
pub use ring_buffer::{RingBuffer, RingBufferError};
pub use source::{Rune, RuneSource, SourceError, SourcePosition, SourceSpan};
pub use token::{Token, TokenKind};
