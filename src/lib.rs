//! Markstream - backtrackable character stream for parser front-ends
//!
//! # Architecture
//!
//! ```text
//! markstream-config/  - Pure configuration data
//! markstream-core/    - Stream, marks, backing sources (no global state)
//! markstream-cli/     - `markstream` binary
//! src/
//! ├── api.rs     - Scanning operations over a stream (input → output)
//! ├── config.rs  - Global configuration singleton
//! └── logger.rs  - tracing-subscriber initialisation
//! ```
//!
//! # Quick Start
//!
//! ```
//! use markstream::{open_text, stream, CharStream};
//!
//! let mut source = open_text("rule \"R1\"\nend");
//! let mut s = stream(&mut source);
//! assert!(s.matches_text("rule").unwrap());
//! assert_eq!(s.index(), 4);
//! ```

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

pub mod api;
pub mod config;
pub mod logger;

// 重导出常用类型
pub use api::{find, fold_word, inspect, Match, UnitReport};
pub use config::{Config, LogConfig, LogLevel, Phase, SourceConfig, StreamConfig};
pub use logger::{init_test_logger, init_with_file, init_with_format, LogFormat, LoggerError};
pub use markstream_core::{
    BackingSource, CharStream, MarkedCharStream, Marker, Position, ReaderSource, SourceError,
    TextSource, Unit,
};

/// 初始化（使用前先调用）
///
/// 只初始化配置，不初始化日志系统。
pub fn init(config: Config) {
    config::init(config);
}

/// 初始化配置和日志系统
///
/// # Example
/// ```ignore
/// use markstream::{init_with_logger, Config, LogFormat};
///
/// init_with_logger(Config::default(), LogFormat::Pretty).unwrap();
/// ```
pub fn init_with_logger(config: Config, format: LogFormat) -> Result<(), LoggerError> {
    config::init(config);
    logger::init_with_format(&config::config().log, format)
}

/// 用全局配置创建内存文本源
pub fn open_text(text: &str) -> TextSource {
    TextSource::with_config(text, &config::config_or_default().source)
}

/// 用全局配置包装任意 reader
pub fn open_reader<R: Read>(reader: R) -> ReaderSource<R> {
    ReaderSource::with_config(reader, &config::config_or_default().source)
}

/// 打开文件作为增量读取的源
pub fn open_file(path: impl AsRef<Path>) -> io::Result<ReaderSource<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(open_reader(BufReader::new(file)))
}

/// 用全局配置在 `source` 上创建字符流
pub fn stream<S: BackingSource>(source: &mut S) -> MarkedCharStream<'_, S> {
    MarkedCharStream::with_config(source, &config::config_or_default().stream)
}
