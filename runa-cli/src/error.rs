//! CLI 错误类型

use std::io;
use std::path::PathBuf;

use runa_config::ConfigError;
use runa_core::kit::{GraphError, SourceError, SourcePosition};
use runa_core::{LexError, ParseError};
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot read standard input: {0}")]
    Stdin(#[source] io::Error),

    #[error("cannot write output: {0}")]
    Write(#[source] io::Error),

    #[error("cannot parse config '{path}': {source}")]
    ConfigFormat {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot open log file '{path}': {source}")]
    LogFile { path: PathBuf, source: io::Error },

    #[error("cannot install logger: {0}")]
    LogInit(#[from] TryInitError),

    #[error("grammar '{grammar}' cannot be used in {mode} mode")]
    GrammarMode {
        grammar: &'static str,
        mode: &'static str,
    },

    #[error("invalid grammar: {0}")]
    Grammar(#[from] GraphError),

    #[error("{source}")]
    Source {
        source: SourceError,
        position: SourcePosition,
    },

    #[error("{source}")]
    Lex {
        source: LexError,
        position: SourcePosition,
    },

    #[error("{source}")]
    Parse {
        source: ParseError,
        position: SourcePosition,
    },

    #[error("input is not balanced ({depth} unclosed symbol(s))")]
    Unmatched {
        depth: usize,
        position: SourcePosition,
    },
}

impl CliError {
    /// 出错位置（仅输入相关的错误）
    pub fn position(&self) -> Option<SourcePosition> {
        match self {
            CliError::Source { position, .. }
            | CliError::Lex { position, .. }
            | CliError::Parse { position, .. }
            | CliError::Unmatched { position, .. } => Some(*position),
            _ => None,
        }
    }
}
