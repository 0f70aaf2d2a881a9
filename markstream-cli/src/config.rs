//! CLI 配置
//!
//! 配置文件（JSON）与命令行参数的合并：文件提供基础值，参数覆盖。

use std::path::Path;

use markstream_config::{Config, LogLevel};

/// 命令行中可覆盖配置的部分
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub case_fold: bool,
    pub source_name: Option<String>,
}

/// 读取配置文件，未指定时使用默认配置
pub fn load_config(path: Option<&Path>) -> Result<Config, String> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config '{}': {}", path.display(), e))?;
    Config::from_json(&content)
        .map_err(|e| format!("Failed to parse config '{}': {}", path.display(), e))
}

/// 用命令行参数覆盖配置
pub fn apply_overrides(mut config: Config, overrides: &Overrides) -> Result<Config, String> {
    if let Some(level) = &overrides.log_level {
        config.log.global =
            LogLevel::parse(level).ok_or_else(|| format!("Unknown log level '{}'", level))?;
    }
    if overrides.case_fold {
        config.stream.case_fold = true;
    }
    if let Some(name) = &overrides.source_name {
        config.stream.source_name = name.clone();
    }
    Ok(config)
}
