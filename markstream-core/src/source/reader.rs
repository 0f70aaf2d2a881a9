//! 增量读取后备源
//!
//! 从任意 `io::Read` 按块拉取字节，按需解码 UTF-8，
//! 解码出的字符全部保留以支持回退和区间读取。

use std::io::{ErrorKind, Read};

use markstream_config::SourceConfig;
use tracing::{trace, warn};

use super::{BackingSource, History, SourceError, TARGET};
use crate::position::Unit;

/// 增量后备源
pub struct ReaderSource<R> {
    reader: R,
    /// 读入的字节，`offset` 之前的部分已解码
    pending: Vec<u8>,
    offset: usize,
    chunk: Vec<u8>,
    history: History,
    /// 底层 reader 已读尽
    drained: bool,
}

impl<R: Read> ReaderSource<R> {
    /// 使用默认配置创建
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &SourceConfig::default())
    }

    /// 按配置创建
    pub fn with_config(reader: R, config: &SourceConfig) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            offset: 0,
            chunk: vec![0; config.read_chunk_size.max(1)],
            history: History::new(Vec::new(), config.backup_window),
            drained: false,
        }
    }

    /// 已解码并保留的单元数
    pub fn decoded(&self) -> usize {
        self.history.retained()
    }

    /// 当前读游标
    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }

    /// 再解码一个字符放入保留区，reader 读尽且无剩余字节时返回 false
    fn decode_next(&mut self) -> Result<bool, SourceError> {
        loop {
            if let Some(c) = self.take_char() {
                self.history.push(c);
                return Ok(true);
            }
            if self.drained {
                if self.unread().is_empty() {
                    return Ok(false);
                }
                // reader 已读尽但序列不完整：只丢弃首字节，其余字节重新解码
                warn!(
                    target: TARGET,
                    offset = self.history.retained(),
                    "Incomplete UTF-8 sequence at EOF: {:02X?}",
                    self.unread()
                );
                self.offset += 1;
                self.history.push(replacement_char());
                return Ok(true);
            }
            self.fill()?;
        }
    }

    /// 从 reader 拉取一块字节
    fn fill(&mut self) -> Result<(), SourceError> {
        // 已解码的字节只在补充时整体移除一次
        self.pending.drain(..self.offset);
        self.offset = 0;
        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(0) => {
                    trace!(target: TARGET, "Reader drained");
                    self.drained = true;
                    return Ok(());
                }
                Ok(n) => {
                    trace!(target: TARGET, bytes = n, "Pulled chunk");
                    self.pending.extend_from_slice(&self.chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(target: TARGET, "Reader failed: {}", e);
                    return Err(e.into());
                }
            }
        }
    }

    /// 从未解码字节头部解出一个完整字符；字节不够时返回 None
    fn take_char(&mut self) -> Option<char> {
        let lead = *self.unread().first()?;

        let seq_len = match utf8_sequence_length(lead) {
            Some(len) => len,
            None => {
                warn!(
                    target: TARGET,
                    offset = self.history.retained(),
                    "Invalid UTF-8 lead byte: 0x{:02X}",
                    lead
                );
                self.offset += 1;
                return Some(replacement_char());
            }
        };

        let bytes = self.unread();
        if bytes.len() < seq_len {
            return None;
        }

        let c = match std::str::from_utf8(&bytes[..seq_len]) {
            Ok(s) => s.chars().next().unwrap_or(replacement_char()),
            Err(e) => {
                warn!(
                    target: TARGET,
                    offset = self.history.retained(),
                    "UTF-8 decode error for bytes {:02X?}: {}",
                    &bytes[..seq_len],
                    e
                );
                // 只丢弃首字节，后续字节重新参与解码
                self.offset += 1;
                return Some(replacement_char());
            }
        };
        self.offset += seq_len;
        Some(c)
    }
}

impl<R: Read> BackingSource for ReaderSource<R> {
    type Error = SourceError;

    fn read_one(&mut self) -> Result<Unit, SourceError> {
        if self.history.exhausted() && !self.drained_and_empty() {
            self.decode_next()?;
        }
        Ok(self.history.next_unit())
    }

    fn backup(&mut self, count: usize) -> Result<(), SourceError> {
        self.history.backup(count)
    }

    fn read_range(&self, start: usize, stop: usize) -> Result<String, SourceError> {
        self.history.range(start, stop)
    }
}

impl<R> ReaderSource<R> {
    /// 尚未解码的字节
    fn unread(&self) -> &[u8] {
        &self.pending[self.offset..]
    }

    fn drained_and_empty(&self) -> bool {
        self.drained && self.unread().is_empty()
    }
}

/// 获取UTF-8序列长度
fn utf8_sequence_length(lead_byte: u8) -> Option<usize> {
    match lead_byte {
        0x00..=0x7F => Some(1),
        0xC0..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF7 => Some(4),
        _ => None,
    }
}

/// Unicode替换字符（用于错误恢复）
fn replacement_char() -> char {
    '\u{FFFD}'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// 每次最多返回一个字节的 reader，用来切断多字节序列
    struct Trickle<'a> {
        bytes: &'a [u8],
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.bytes.split_first() {
                Some((&b, rest)) if !buf.is_empty() => {
                    buf[0] = b;
                    self.bytes = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other, "disk on fire"))
        }
    }

    fn read_all<R: Read>(source: &mut ReaderSource<R>) -> String {
        let mut out = String::new();
        while let Unit::Char(c) = source.read_one().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_reader_ascii() {
        let mut source = ReaderSource::new(Cursor::new(b"abc".to_vec()));
        assert_eq!(read_all(&mut source), "abc");
        assert_eq!(source.decoded(), 3);
    }

    #[test]
    fn test_reader_decodes_lazily() {
        let config = SourceConfig {
            read_chunk_size: 1,
            ..SourceConfig::default()
        };
        let mut source = ReaderSource::with_config(Cursor::new(b"abcdef".to_vec()), &config);
        assert_eq!(source.read_one().unwrap(), Unit::Char('a'));
        assert_eq!(source.decoded(), 1);
    }

    #[test]
    fn test_reader_split_multibyte() {
        let text = "中文🎉";
        let mut source = ReaderSource::new(Trickle {
            bytes: text.as_bytes(),
        });
        assert_eq!(read_all(&mut source), text);
    }

    #[test]
    fn test_reader_backup_replays_retained() {
        let mut source = ReaderSource::new(Cursor::new("héllo".as_bytes().to_vec()));
        source.read_one().unwrap();
        source.read_one().unwrap();
        source.read_one().unwrap();
        source.backup(2).unwrap();
        assert_eq!(source.read_one().unwrap(), Unit::Char('é'));
        assert_eq!(source.read_range(0, 3).unwrap(), "hél");
    }

    #[test]
    fn test_reader_eof_advances_cursor() {
        let mut source = ReaderSource::new(Cursor::new(b"x".to_vec()));
        source.read_one().unwrap();
        assert_eq!(source.read_one().unwrap(), Unit::Eof);
        assert_eq!(source.read_one().unwrap(), Unit::Eof);
        assert_eq!(source.cursor(), 3);
        source.backup(3).unwrap();
        assert_eq!(source.read_one().unwrap(), Unit::Char('x'));
    }

    #[test]
    fn test_reader_range_limited_to_decoded() {
        let mut source = ReaderSource::new(Cursor::new(b"abcdef".to_vec()));
        source.read_one().unwrap();
        source.read_one().unwrap();
        assert_eq!(source.read_range(0, 2).unwrap(), "ab");
        assert!(matches!(
            source.read_range(0, 5),
            Err(SourceError::RangeOutOfBounds { len: 2, .. })
        ));
    }

    #[test]
    fn test_reader_invalid_lead_byte() {
        let mut source = ReaderSource::new(Cursor::new(vec![0x80, b'a']));
        assert_eq!(source.read_one().unwrap(), Unit::Char('\u{FFFD}'));
        assert_eq!(source.read_one().unwrap(), Unit::Char('a'));
    }

    #[test]
    fn test_reader_bad_continuation() {
        // 0xE4 期望三字节序列，但第二字节是 ASCII
        let mut source = ReaderSource::new(Cursor::new(vec![0xE4, b'a', b'b']));
        assert_eq!(source.read_one().unwrap(), Unit::Char('\u{FFFD}'));
        assert_eq!(source.read_one().unwrap(), Unit::Char('a'));
        assert_eq!(source.read_one().unwrap(), Unit::Char('b'));
    }

    #[test]
    fn test_reader_incomplete_at_eof() {
        let mut source = ReaderSource::new(Cursor::new(vec![b'a', 0xF0]));
        assert_eq!(source.read_one().unwrap(), Unit::Char('a'));
        assert_eq!(source.read_one().unwrap(), Unit::Char('\u{FFFD}'));
        assert_eq!(source.read_one().unwrap(), Unit::Eof);
    }

    #[test]
    fn test_reader_truncated_sequence_keeps_following_bytes() {
        let mut source = ReaderSource::new(Cursor::new(vec![0xE4, b'a']));
        assert_eq!(source.read_one().unwrap(), Unit::Char('\u{FFFD}'));
        assert_eq!(source.read_one().unwrap(), Unit::Char('a'));
        assert_eq!(source.read_one().unwrap(), Unit::Eof);

        let mut source = ReaderSource::new(Cursor::new(vec![0xF0, b'a', b'b']));
        assert_eq!(read_all(&mut source), "\u{FFFD}ab");
        assert_eq!(source.decoded(), 3);
    }

    #[test]
    fn test_reader_truncated_sequence_trickled() {
        let mut source = ReaderSource::new(Trickle {
            bytes: &[b'x', 0xF0, 0x9F, b'y'],
        });
        assert_eq!(read_all(&mut source), "x\u{FFFD}\u{FFFD}y");
    }

    #[test]
    fn test_reader_large_chunk_decodes_everything() {
        let config = SourceConfig {
            read_chunk_size: 1 << 20,
            ..SourceConfig::default()
        };
        let text = "ab中\n".repeat(50_000);
        let mut source =
            ReaderSource::with_config(Cursor::new(text.as_bytes().to_vec()), &config);
        let decoded = read_all(&mut source);
        assert_eq!(decoded.chars().count(), 200_000);
        assert_eq!(decoded, text);
    }

    #[test]
    fn test_reader_io_error_propagates() {
        let mut source = ReaderSource::new(Broken);
        assert!(matches!(source.read_one(), Err(SourceError::Io(_))));
    }

    #[test]
    fn test_reader_backup_window() {
        let config = SourceConfig {
            backup_window: Some(1),
            ..SourceConfig::default()
        };
        let mut source = ReaderSource::with_config(Cursor::new(b"abc".to_vec()), &config);
        source.read_one().unwrap();
        source.read_one().unwrap();
        assert!(matches!(
            source.backup(2),
            Err(SourceError::BackupWindowExceeded { .. })
        ));
    }
}
