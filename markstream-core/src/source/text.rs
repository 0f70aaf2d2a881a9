//! 内存文本后备源

use markstream_config::SourceConfig;

use super::{BackingSource, History, SourceError};
use crate::position::Unit;

/// 整段文本一次性保留在内存中的后备源
///
/// # Example
/// ```
/// use markstream_core::{BackingSource, TextSource, Unit};
///
/// let mut source = TextSource::new("ab");
/// assert_eq!(source.read_one().unwrap(), Unit::Char('a'));
/// source.backup(1).unwrap();
/// assert_eq!(source.read_range(0, 2).unwrap(), "ab");
/// ```
#[derive(Debug, Clone)]
pub struct TextSource {
    history: History,
}

impl TextSource {
    /// 创建不限回退窗口的文本源
    pub fn new(text: &str) -> Self {
        Self {
            history: History::new(text.chars().collect(), None),
        }
    }

    /// 按配置创建文本源
    pub fn with_config(text: &str, config: &SourceConfig) -> Self {
        Self {
            history: History::new(text.chars().collect(), config.backup_window),
        }
    }

    /// 限制单次回退的最大单元数
    pub fn with_backup_window(mut self, window: usize) -> Self {
        self.history.set_backup_window(Some(window));
        self
    }

    /// 文本长度（单元数）
    pub fn len(&self) -> usize {
        self.history.retained()
    }

    /// 是否为空文本
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 当前读游标
    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }
}

impl BackingSource for TextSource {
    type Error = SourceError;

    fn read_one(&mut self) -> Result<Unit, SourceError> {
        Ok(self.history.next_unit())
    }

    fn backup(&mut self, count: usize) -> Result<(), SourceError> {
        self.history.backup(count)
    }

    fn read_range(&self, start: usize, stop: usize) -> Result<String, SourceError> {
        self.history.range(start, stop)
    }
}
