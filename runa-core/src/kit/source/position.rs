//! 源位置追踪
//!
//! - line/column: 人类可读的错误显示（1-based）
//! - byte_offset: 输入流中的绝对字节偏移（0-based），包括被跳过的空白

use std::fmt;

/// 源位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    /// 行号，1-based
    pub line: usize,
    /// 列号，1-based，Unicode码点计数
    pub column: usize,
    /// 字节偏移，0-based
    pub byte_offset: usize,
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::start()
    }
}

impl SourcePosition {
    pub fn new(line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }

    /// 输入起始位置
    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            byte_offset: 0,
        }
    }

    /// 前进一个字符
    ///
    /// `width` 是输入中实际消费的字节数；非法序列被替换为 U+FFFD 时
    /// 与 `c.len_utf8()` 不同。
    pub fn advance(&mut self, c: char, width: usize) {
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.byte_offset += width;
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// 源区间（Span）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSpan {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

impl SourceSpan {
    /// 从起始位置创建区间（结束位置相同）
    pub fn at(pos: SourcePosition) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub fn range(start: SourcePosition, end: SourcePosition) -> Self {
        Self { start, end }
    }

    /// 区间覆盖的输入字节数
    pub fn byte_len(&self) -> usize {
        self.end.byte_offset - self.start.byte_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_start() {
        let pos = SourcePosition::start();
        assert_eq!(pos.line, 1);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.byte_offset, 0);
    }

    #[test]
    fn test_position_advance_newline() {
        let mut pos = SourcePosition::start();

        pos.advance('a', 1);
        pos.advance('\n', 1);

        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 1);
        assert_eq!(pos.byte_offset, 2);
    }

    #[test]
    fn test_position_advance_cjk() {
        let mut pos = SourcePosition::start();

        pos.advance('中', 3);
        assert_eq!(pos.column, 2);
        assert_eq!(pos.byte_offset, 3);
    }

    #[test]
    fn test_span_byte_len() {
        let start = SourcePosition::new(1, 1, 4);
        let end = SourcePosition::new(1, 3, 9);
        assert_eq!(SourceSpan::range(start, end).byte_len(), 5);
        assert_eq!(SourceSpan::at(start).byte_len(), 0);
        assert_eq!(format!("{}", end), "1:3");
    }
}
