//! CLI 配置
//!
//! 从可选的 JSON 文件读取 `RunaConfig`，再用命令行参数覆盖

use std::path::Path;

use runa_config::{LogLevel, RunaConfig, SourceConfig};

use crate::error::CliError;

/// 命令行中可以覆盖配置文件的参数
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub capacity: Option<usize>,
    pub log_level: Option<LogLevel>,
}

/// 读取配置文件；未指定时使用默认配置
pub fn load(path: Option<&Path>) -> Result<RunaConfig, CliError> {
    let Some(path) = path else {
        return Ok(RunaConfig::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    from_json(&content).map_err(|source| CliError::ConfigFormat {
        path: path.to_path_buf(),
        source,
    })
}

pub fn from_json(content: &str) -> Result<RunaConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// 合并命令行参数并校验
pub fn resolve(mut config: RunaConfig, overrides: &Overrides) -> Result<RunaConfig, CliError> {
    if let Some(capacity) = overrides.capacity {
        config.source = SourceConfig::with_capacity(capacity);
    }
    if let Some(level) = overrides.log_level {
        config.log.global = level;
    }
    config.validate()?;
    Ok(config)
}
