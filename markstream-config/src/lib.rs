//! Markstream Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Markstream crates.
//!
//! Every section deserializes with defaults, so a partial JSON document such as
//! `{"stream": {"case_fold": true}}` is a complete configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Character stream settings
    pub stream: StreamConfig,
    /// Backing source settings
    pub source: SourceConfig,
    /// Per-phase log levels
    pub log: LogConfig,
}

impl Config {
    /// Parse a configuration from a JSON document
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the configuration as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Configuration for a character stream instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Name reported by `source_name()`
    pub source_name: String,
    /// Lower-case letters returned by lookahead
    pub case_fold: bool,
    /// Mark slots allocated up front
    pub mark_capacity: usize,
}

/// Configuration for the bundled backing sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Largest single backup the source accepts (None = unbounded)
    pub backup_window: Option<usize>,
    /// Bytes pulled from a reader per fill
    pub read_chunk_size: usize,
}

/// Log level, independent of any logging backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse a level name; "silent" maps to `Error`
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

/// Per-phase log levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level for every target
    pub global: LogLevel,
    /// Stream level (None falls back to global)
    pub stream: Option<LogLevel>,
    /// Source level
    pub source: Option<LogLevel>,
    /// CLI level
    pub cli: Option<LogLevel>,
}

impl LogConfig {
    /// Effective level for a phase
    pub fn level_for(&self, phase: Phase) -> LogLevel {
        let specific = match phase {
            Phase::Stream => self.stream,
            Phase::Source => self.source,
            Phase::Cli => self.cli,
        };
        specific.unwrap_or(self.global)
    }
}

/// Phase enum for phase-specific log configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Stream,
    Source,
    Cli,
}

impl Phase {
    /// All phases, in target order
    pub const ALL: [Phase; 3] = [Phase::Stream, Phase::Source, Phase::Cli];

    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Stream => "stream",
            Phase::Source => "source",
            Phase::Cli => "cli",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> &'static str {
        match self {
            Phase::Stream => "markstream::stream",
            Phase::Source => "markstream::source",
            Phase::Cli => "markstream::cli",
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            source_name: String::from("<input>"),
            case_fold: false,
            mark_capacity: 8,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backup_window: None,
            read_chunk_size: 4096,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: LogLevel::Info,
            stream: None,
            source: None,
            cli: None,
        }
    }
}
