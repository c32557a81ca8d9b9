//! 测试辅助工具
//!
//! 内存输入、分块读取器，以及跑完整个自动机的辅助函数

#![allow(dead_code)]

use std::io::{self, Cursor, Read};

use runa_core::grammars::{DemoKind, Grammar};
use runa_core::lexer::{LexError, LexState};
use runa_core::parser::{ElementTree, ParseError, ParseState};
use runa_core::RuneSource;

pub const CAPACITY: usize = 256;

pub fn source(input: &str) -> RuneSource<Cursor<Vec<u8>>> {
    RuneSource::new(Cursor::new(input.as_bytes().to_vec()), CAPACITY).unwrap()
}

/// 每次 read 最多返回 `chunk` 字节
pub struct Chunked {
    data: Vec<u8>,
    offset: usize,
    chunk: usize,
}

impl Chunked {
    pub fn new(input: &str, chunk: usize) -> Self {
        Self {
            data: input.as_bytes().to_vec(),
            offset: 0,
            chunk,
        }
    }
}

impl Read for Chunked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = &self.data[self.offset..];
        let n = self.chunk.min(buf.len()).min(rest.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.offset += n;
        Ok(n)
    }
}

/// 一次完整词法分析的结果
#[derive(Debug)]
pub struct LexOutcome {
    pub lexemes: Vec<String>,
    pub error: Option<LexError>,
    pub matched: bool,
    pub finished: bool,
}

impl LexOutcome {
    /// 没有错误且配对完整
    pub fn accepted(&self) -> bool {
        self.error.is_none() && self.matched
    }
}

pub fn lex(grammar: &Grammar<LexState<DemoKind>>, input: &str) -> LexOutcome {
    let mut machine = grammar.lexer(source(input)).unwrap();
    let mut lexemes = Vec::new();
    let mut error = None;
    for item in machine.tokens() {
        match item {
            Ok(token) if token.is_end_of_lexing() => {}
            Ok(token) => lexemes.push(token.lexeme),
            Err(e) => error = Some(e),
        }
    }
    LexOutcome {
        lexemes,
        error,
        matched: machine.is_matched(),
        finished: machine.finished(),
    }
}

pub fn parse(
    grammar: &Grammar<ParseState<DemoKind>>,
    input: &str,
) -> Result<ElementTree<DemoKind>, ParseError> {
    let mut machine = grammar.parser(source(input));
    machine.run()?;
    machine.into_tree()
}
