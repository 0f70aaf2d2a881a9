//! 后备源
//!
//! 字符流只向前读取的底层文本提供者。契约：
//! - `read_one` 返回下一个单元并推进游标；越过末尾后返回 `Unit::Eof`，游标照样推进
//! - `backup(n)` 撤销最近 n 次前向读取
//! - `read_range(start, stop)` 返回绝对区间 `[start, stop)` 的原文
//!
//! 后备源保留所有已产生的单元，因此任意已读区间都能重新取出。

mod reader;
mod text;

pub use reader::ReaderSource;
pub use text::TextSource;

use tracing::warn;

use crate::position::Unit;

/// 日志目标
pub(crate) const TARGET: &str = "markstream::source";

/// 后备源错误
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Cannot back up {requested} units, only {available} have been read")]
    BackupUnderflow { requested: usize, available: usize },

    #[error("Backup of {requested} units exceeds the backup window of {window}")]
    BackupWindowExceeded { requested: usize, window: usize },

    #[error("Range {start}..{stop} out of bounds for {len} retained units")]
    RangeOutOfBounds {
        start: usize,
        stop: usize,
        len: usize,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 后备源 trait
///
/// 字符流只通过这三个操作驱动后备源
pub trait BackingSource {
    /// 后备源错误类型，字符流原样向上传递
    type Error: std::error::Error;

    /// 读取一个单元并推进游标
    fn read_one(&mut self) -> Result<Unit, Self::Error>;

    /// 撤销最近 `count` 次前向读取
    fn backup(&mut self, count: usize) -> Result<(), Self::Error>;

    /// 读取绝对区间 `[start, stop)` 的原文
    fn read_range(&self, start: usize, stop: usize) -> Result<String, Self::Error>;
}

impl<S: BackingSource + ?Sized> BackingSource for &mut S {
    type Error = S::Error;

    fn read_one(&mut self) -> Result<Unit, Self::Error> {
        (**self).read_one()
    }

    fn backup(&mut self, count: usize) -> Result<(), Self::Error> {
        (**self).backup(count)
    }

    fn read_range(&self, start: usize, stop: usize) -> Result<String, Self::Error> {
        (**self).read_range(start, stop)
    }
}

/// 已产生单元的保留区与读游标
///
/// 游标可以越过末尾（每次 EOF 读取都会推进）
#[derive(Debug, Clone)]
pub(crate) struct History {
    chars: Vec<char>,
    cursor: usize,
    backup_window: Option<usize>,
}

impl History {
    pub(crate) fn new(chars: Vec<char>, backup_window: Option<usize>) -> Self {
        Self {
            chars,
            cursor: 0,
            backup_window,
        }
    }

    pub(crate) fn set_backup_window(&mut self, backup_window: Option<usize>) {
        self.backup_window = backup_window;
    }

    /// 游标是否已追上保留区末尾
    pub(crate) fn exhausted(&self) -> bool {
        self.cursor >= self.chars.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn retained(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn push(&mut self, c: char) {
        self.chars.push(c);
    }

    pub(crate) fn next_unit(&mut self) -> Unit {
        let unit = self
            .chars
            .get(self.cursor)
            .copied()
            .map_or(Unit::Eof, Unit::Char);
        self.cursor += 1;
        unit
    }

    pub(crate) fn backup(&mut self, count: usize) -> Result<(), SourceError> {
        if let Some(window) = self.backup_window {
            if count > window {
                warn!(target: TARGET, requested = count, window, "Backup exceeds window");
                return Err(SourceError::BackupWindowExceeded {
                    requested: count,
                    window,
                });
            }
        }
        if count > self.cursor {
            warn!(
                target: TARGET,
                requested = count,
                available = self.cursor,
                "Backup before start of input"
            );
            return Err(SourceError::BackupUnderflow {
                requested: count,
                available: self.cursor,
            });
        }
        self.cursor -= count;
        Ok(())
    }

    pub(crate) fn range(&self, start: usize, stop: usize) -> Result<String, SourceError> {
        if start > stop || stop > self.chars.len() {
            return Err(SourceError::RangeOutOfBounds {
                start,
                stop,
                len: self.chars.len(),
            });
        }
        Ok(self.chars[start..stop].iter().collect())
    }
}
