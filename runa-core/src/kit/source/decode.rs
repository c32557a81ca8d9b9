//! UTF-8 解码辅助

/// Unicode替换字符（用于非法序列）
pub const REPLACEMENT: char = '\u{FFFD}';

/// 单步解码结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// 合法字符及其字节宽度
    Char(char, usize),
    /// 非法序列，需跳过的字节数
    Invalid(usize),
    /// 字节不足（可能需要补充输入）
    Incomplete,
}

/// 获取UTF-8序列长度
fn utf8_sequence_length(lead_byte: u8) -> Option<usize> {
    match lead_byte {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None, // 续字节或超出范围
    }
}

/// 从字节切片头部解码一个字符
pub(crate) fn decode(bytes: &[u8]) -> Decoded {
    let Some(&lead) = bytes.first() else {
        return Decoded::Incomplete;
    };

    let Some(seq_len) = utf8_sequence_length(lead) else {
        return Decoded::Invalid(1);
    };

    let available = bytes.len().min(seq_len);
    if let Some(bad) = (1..available).find(|&i| bytes[i] & 0xC0 != 0x80) {
        return Decoded::Invalid(bad);
    }
    if available < seq_len {
        return Decoded::Incomplete;
    }

    match std::str::from_utf8(&bytes[..seq_len]) {
        Ok(s) => match s.chars().next() {
            Some(c) => Decoded::Char(c, seq_len),
            None => Decoded::Invalid(seq_len),
        },
        // 过长编码、代理区、超出 U+10FFFF
        Err(e) => Decoded::Invalid(e.error_len().unwrap_or(seq_len).max(1)),
    }
}

/// 被 RuneSource 丢弃的空白（换行除外）
pub(crate) fn is_skippable(c: char) -> bool {
    c.is_whitespace() && c != '\n'
}
