//! 全局配置
//!
//! 提供线程安全的全局配置单例。核心库本身只接收显式传入的配置，
//! 这里的单例只服务于门面层和 CLI。
//!
//! # 使用示例
//! ```
//! use markstream::config::{self, Config};
//!
//! if !config::is_initialized() {
//!     config::init(Config::default());
//! }
//! assert!(!config::config().stream.source_name.is_empty());
//! ```

use once_cell::sync::OnceCell;

pub use markstream_config::{Config, LogConfig, LogLevel, Phase, SourceConfig, StreamConfig};

static GLOBAL_CONFIG: OnceCell<Config> = OnceCell::new();

/// 初始化全局配置（只能调用一次）
///
/// # Panics
/// 如果配置已经初始化，会 panic
pub fn init(config: Config) {
    GLOBAL_CONFIG
        .set(config)
        .expect("Config already initialized");
}

/// 尝试初始化全局配置，已初始化时原样返回传入的配置
pub fn try_init(config: Config) -> Result<(), Config> {
    GLOBAL_CONFIG.set(config)
}

/// 获取全局配置引用
///
/// # Panics
/// 如果配置未初始化，会 panic
pub fn config() -> &'static Config {
    GLOBAL_CONFIG.get().expect("Config not initialized")
}

/// 获取全局配置，未初始化时使用默认值
pub fn config_or_default() -> &'static Config {
    GLOBAL_CONFIG.get_or_init(Config::default)
}

/// 检查配置是否已初始化
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
