//! 字符源
//!
//! 从任意 `io::Read` 读取字节到固定容量的缓冲区，解码为 UTF-8 字符，
//! 支持单字符回退、词素（lexeme）累积与发射。
//!
//! 换行以外的空白字符不会返回给调用者，也不会出现在任何词素中。

mod decode;
mod position;

pub use decode::REPLACEMENT;
pub use position::{SourcePosition, SourceSpan};

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Read};

use runa_config::{ConfigError, SourceConfig};
use thiserror::Error;
use tracing::{trace, warn};

use self::decode::{decode, is_skippable, Decoded};
use super::token::Token;

const TARGET: &str = "runa::source";

/// 字符源读出的单位：字符或流结束标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rune {
    Char(char),
    /// 流结束，不等于任何合法字符
    Eof,
}

impl Rune {
    pub fn as_char(&self) -> Option<char> {
        match self {
            Rune::Char(c) => Some(*c),
            Rune::Eof => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Rune::Eof)
    }
}

impl From<char> for Rune {
    fn from(c: char) -> Self {
        Rune::Char(c)
    }
}

impl fmt::Display for Rune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rune::Char(c) => write!(f, "{c:?}"),
            Rune::Eof => write!(f, "EOF"),
        }
    }
}

/// 字符源错误
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error while reading source: {0}")]
    Io(#[from] io::Error),

    #[error("lexeme exceeds the source buffer capacity of {capacity} bytes")]
    LexemeOverflow { capacity: usize },

    #[error("invalid source configuration: {0}")]
    Config(#[from] ConfigError),
}

/// 带缓冲的字符源
///
/// 不变量：`start <= pos <= length <= capacity`
pub struct RuneSource<R> {
    reader: R,
    buffer: Vec<u8>,
    length: usize, // 缓冲区中有效字节数
    pos: usize,    // 读取游标
    start: usize,  // 当前词素起点
    width: usize,  // 上一个字符的字节宽度
    exhausted: bool,
    position: SourcePosition,
    previous: SourcePosition,
    lexeme_start: SourcePosition,
}

impl<R: Read> RuneSource<R> {
    /// 创建指定缓冲容量的字符源
    pub fn new(reader: R, capacity: usize) -> Result<Self, SourceError> {
        Self::from_config(reader, &SourceConfig::with_capacity(capacity))
    }

    pub fn from_config(reader: R, config: &SourceConfig) -> Result<Self, SourceError> {
        config.validate()?;
        trace!(target: TARGET, capacity = config.capacity, "creating rune source");
        Ok(Self {
            reader,
            buffer: vec![0; config.capacity],
            length: 0,
            pos: 0,
            start: 0,
            width: 0,
            exhausted: false,
            position: SourcePosition::start(),
            previous: SourcePosition::start(),
            lexeme_start: SourcePosition::start(),
        })
    }

    /// 读取下一个字符
    ///
    /// 换行以外的空白被跳过，并从缓冲区中剔除，使正在累积的词素保持连续。
    /// 输入耗尽后始终返回 `Rune::Eof`，直到 `reset`/`attach`。
    pub fn next(&mut self) -> Result<Rune, SourceError> {
        loop {
            let (c, width) = match decode(&self.buffer[self.pos..self.length]) {
                Decoded::Char(c, width) => (c, width),
                Decoded::Invalid(width) => {
                    warn!(
                        target: TARGET,
                        bytes = ?&self.buffer[self.pos..self.pos + width],
                        position = %self.position,
                        "invalid UTF-8 sequence, substituting U+FFFD"
                    );
                    (REPLACEMENT, width)
                }
                Decoded::Incomplete if self.exhausted => {
                    let rest = self.length - self.pos;
                    if rest == 0 {
                        self.width = 0;
                        self.previous = self.position;
                        return Ok(Rune::Eof);
                    }
                    warn!(
                        target: TARGET,
                        trailing_bytes = rest,
                        position = %self.position,
                        "incomplete UTF-8 sequence at end of stream"
                    );
                    (REPLACEMENT, rest)
                }
                Decoded::Incomplete => {
                    self.fill()?;
                    continue;
                }
            };

            if is_skippable(c) {
                self.buffer.copy_within(self.pos + width..self.length, self.pos);
                self.length -= width;
                self.position.advance(c, width);
                if self.start == self.pos {
                    self.lexeme_start = self.position;
                }
                continue;
            }

            self.previous = self.position;
            self.pos += width;
            self.width = width;
            self.position.advance(c, width);
            return Ok(Rune::Char(c));
        }
    }

    /// 预读下一个字符（不前进）
    pub fn peek(&mut self) -> Result<Rune, SourceError> {
        let rune = self.next()?;
        self.backup();
        Ok(rune)
    }

    /// 回退上一个读出的字符
    ///
    /// 只支持一次回退；连续第二次调用不做任何事。
    /// 游标不会退到词素起点之前。
    pub fn backup(&mut self) {
        if self.width == 0 || self.pos < self.start + self.width {
            self.width = 0;
            return;
        }
        self.pos -= self.width;
        self.width = 0;
        self.position = self.previous;
    }

    /// 丢弃已累积的词素
    pub fn ignore(&mut self) {
        self.start = self.pos;
        self.lexeme_start = self.position;
    }

    /// 以 `[start, pos)` 发射一个令牌，随后词素起点移到游标处
    pub fn emit<K>(&mut self, kind: K) -> Token<K> {
        let lexeme = String::from_utf8_lossy(&self.buffer[self.start..self.pos]).into_owned();
        let span = SourceSpan::range(self.lexeme_start, self.position);
        self.ignore();
        Token::new(lexeme, kind, span)
    }

    /// 当前累积中的词素
    pub fn lexeme(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer[self.start..self.pos])
    }

    /// 重置游标状态，复用于新的输入
    pub fn reset(&mut self) {
        self.length = 0;
        self.pos = 0;
        self.start = 0;
        self.width = 0;
        self.exhausted = false;
        self.position = SourcePosition::start();
        self.previous = SourcePosition::start();
        self.lexeme_start = SourcePosition::start();
    }

    /// 挂接新的读取器并重置，返回旧的读取器
    pub fn attach(&mut self, reader: R) -> R {
        let old = std::mem::replace(&mut self.reader, reader);
        self.reset();
        old
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// 游标位置
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// 缓冲区内的游标偏移
    pub fn cursor(&self) -> usize {
        self.pos
    }

    /// 底层读取器是否已返回过零字节
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// 从读取器补充数据，先把 `[start, length)` 移到缓冲区头部
    fn fill(&mut self) -> Result<(), SourceError> {
        if self.start > 0 {
            self.buffer.copy_within(self.start..self.length, 0);
            self.pos -= self.start;
            self.length -= self.start;
            self.start = 0;
        }
        if self.length == self.buffer.len() {
            warn!(target: TARGET, capacity = self.buffer.len(), "lexeme overflows source buffer");
            return Err(SourceError::LexemeOverflow {
                capacity: self.buffer.len(),
            });
        }

        loop {
            match self.reader.read(&mut self.buffer[self.length..]) {
                Ok(0) => {
                    trace!(target: TARGET, "underlying reader exhausted");
                    self.exhausted = true;
                    return Ok(());
                }
                Ok(n) => {
                    trace!(target: TARGET, bytes = n, "refilled source buffer");
                    self.length += n;
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R> fmt::Debug for RuneSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuneSource")
            .field("capacity", &self.buffer.len())
            .field("length", &self.length)
            .field("pos", &self.pos)
            .field("start", &self.start)
            .field("width", &self.width)
            .field("exhausted", &self.exhausted)
            .field("position", &self.position)
            .finish()
    }
}
