//! Runa Config - Pure configuration data structures
//!
//! This crate contains only data structures, no IO or global state.
//! It serves as the shared configuration vocabulary across all Runa crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 单个 UTF-8 字符编码的最大字节数
pub const MAX_RUNE_WIDTH: usize = 4;

/// 默认缓冲区容量（字节）
pub const DEFAULT_CAPACITY: usize = 256;

/// 配置校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("buffer capacity {capacity} is smaller than the widest rune (4 bytes)")]
    CapacityTooSmall { capacity: usize },
}

/// Configuration for the rune source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Byte capacity of the read buffer; bounds the longest lexeme
    pub capacity: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SourceConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity < MAX_RUNE_WIDTH {
            return Err(ConfigError::CapacityTooSmall {
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// 日志级别
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// 解析日志级别字符串，"silent" 视为 error
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" | "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

/// Execution phase enum for phase-specific log configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Source,
    Lexer,
    Parser,
    Cli,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Source, Phase::Lexer, Phase::Parser, Phase::Cli];

    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Source => "source",
            Phase::Lexer => "lexer",
            Phase::Parser => "parser",
            Phase::Cli => "cli",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("runa::{}", self.as_str())
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// 全局默认日志级别
    pub global: LogLevel,
    /// Source 日志级别（None 表示使用 global）
    pub source: Option<LogLevel>,
    /// Lexer 日志级别
    pub lexer: Option<LogLevel>,
    /// Parser 日志级别
    pub parser: Option<LogLevel>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: LogLevel::Warn,
            source: None,
            lexer: None,
            parser: None,
        }
    }
}

impl LogConfig {
    /// 获取指定阶段的实际日志级别
    pub fn level_for(&self, phase: Phase) -> LogLevel {
        let specific = match phase {
            Phase::Source => self.source,
            Phase::Lexer => self.lexer,
            Phase::Parser => self.parser,
            Phase::Cli => None,
        };
        specific.unwrap_or(self.global)
    }
}

/// 顶层配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunaConfig {
    pub source: SourceConfig,
    pub log: LogConfig,
}

impl RunaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_source_config() {
        let cfg = SourceConfig::default();
        assert_eq!(cfg.capacity, 256);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_capacity_too_small() {
        let cfg = SourceConfig::with_capacity(3);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::CapacityTooSmall { capacity: 3 })
        );
        assert!(SourceConfig::with_capacity(4).validate().is_ok());
    }

    #[test]
    fn test_log_level_for() {
        let cfg = LogConfig {
            global: LogLevel::Warn,
            lexer: Some(LogLevel::Debug),
            ..Default::default()
        };

        assert_eq!(cfg.level_for(Phase::Lexer), LogLevel::Debug);
        assert_eq!(cfg.level_for(Phase::Parser), LogLevel::Warn);
        assert_eq!(cfg.level_for(Phase::Cli), LogLevel::Warn);
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Lexer.as_str(), "lexer");
        assert_eq!(Phase::Source.target(), "runa::source");
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("silent"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let cfg: RunaConfig =
            serde_json::from_str(r#"{ "source": { "capacity": 64 }, "log": { "lexer": "trace" } }"#)
                .unwrap();
        assert_eq!(cfg.source.capacity, 64);
        assert_eq!(cfg.log.global, LogLevel::Warn);
        assert_eq!(cfg.log.level_for(Phase::Lexer), LogLevel::Trace);
    }
}
