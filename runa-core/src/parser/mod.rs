//! 语法自动机
//!
//! 与词法自动机共享状态图与匹配器，但直接读取字符，
//! 把字符流组装为语法元素树。

pub mod element;
pub mod error;
pub mod machine;
pub mod state;

pub use element::{Element, ElementTree};
pub use error::ParseError;
pub use machine::ParseMachine;
pub use state::{ParseGraph, ParseGraphBuilder, ParseState, StateType};
