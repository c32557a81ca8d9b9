use std::fmt;

use super::source::SourceSpan;

/// 令牌类型
///
/// 文法作者定义的类型放在 `User` 中；`Error` 与 `EndOfLexing` 是保留类型，
/// 不会与任何用户类型冲突。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind<K> {
    User(K),
    Error,
    EndOfLexing,
}

/// 令牌：词素与类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<K> {
    pub lexeme: String,
    pub kind: TokenKind<K>,
    pub span: SourceSpan,
}

impl<K> Token<K> {
    pub fn new(lexeme: impl Into<String>, kind: K, span: SourceSpan) -> Self {
        Self {
            lexeme: lexeme.into(),
            kind: TokenKind::User(kind),
            span,
        }
    }

    /// 表示错误的保留令牌
    pub fn error() -> Self {
        Self {
            lexeme: "error".to_string(),
            kind: TokenKind::Error,
            span: SourceSpan::default(),
        }
    }

    /// 表示词法分析结束的保留令牌
    pub fn end_of_lexing() -> Self {
        Self {
            lexeme: "eolex".to_string(),
            kind: TokenKind::EndOfLexing,
            span: SourceSpan::default(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, TokenKind::Error)
    }

    pub fn is_end_of_lexing(&self) -> bool {
        matches!(self.kind, TokenKind::EndOfLexing)
    }

    pub fn user_kind(&self) -> Option<&K> {
        match &self.kind {
            TokenKind::User(kind) => Some(kind),
            _ => None,
        }
    }
}

impl<K> fmt::Display for Token<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.chars().count() > 10 {
            let head: String = self.lexeme.chars().take(10).collect();
            write!(f, "{head:?}...")
        } else {
            write!(f, "{:?}", self.lexeme)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_tokens() {
        let eolex: Token<u8> = Token::end_of_lexing();
        assert!(eolex.is_end_of_lexing());
        assert!(!eolex.is_error());
        assert_eq!(eolex.user_kind(), None);

        let error: Token<u8> = Token::error();
        assert!(error.is_error());
        assert_ne!(error, eolex);
    }

    #[test]
    fn test_user_token_never_equals_reserved() {
        let user = Token::new("eolex", 0u8, SourceSpan::default());
        assert_ne!(user, Token::end_of_lexing());
        assert_eq!(user.user_kind(), Some(&0));
    }

    #[test]
    fn test_display_truncates_long_lexemes() {
        let short = Token::new("ab", (), SourceSpan::default());
        assert_eq!(short.to_string(), "\"ab\"");

        let long = Token::new("abcdefghijklmno", (), SourceSpan::default());
        assert_eq!(long.to_string(), "\"abcdefghij\"...");
    }
}
