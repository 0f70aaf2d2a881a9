//! 测试辅助工具
//!
//! 提供字符流测试的辅助函数

#![allow(dead_code)]

use markstream_core::{CharStream, MarkedCharStream, TextSource};

/// 为当前测试初始化简单日志（仅打印到测试输出）
pub fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// 在 `text` 上创建字符流并执行 `f`
///
/// # Example
/// ```ignore
/// let index = with_stream("abc", false, |s| s.index());
/// assert_eq!(index, 0);
/// ```
pub fn with_stream<T>(
    text: &str,
    case_fold: bool,
    f: impl FnOnce(&mut MarkedCharStream<'_, TextSource>) -> T,
) -> T {
    init_test_logger();
    let mut source = TextSource::new(text);
    let mut stream = MarkedCharStream::new(&mut source, "test", case_fold);
    f(&mut stream)
}

/// (index, line, column)
pub fn snapshot<C: CharStream>(stream: &C) -> (usize, usize, usize) {
    (stream.index(), stream.line(), stream.column())
}

/// 连续消费 `n` 个单元
pub fn advance_n<C: CharStream>(stream: &mut C, n: usize) -> Result<(), C::Error> {
    for _ in 0..n {
        stream.advance()?;
    }
    Ok(())
}

/// 覆盖换行、多字节字符和大小写的样本文本
pub const SAMPLES: &[&str] = &[
    "",
    "AB\nCd",
    "rule \"R1\"\nwhen\n  $p : Person()\nthen\nend\n",
    "\n\n\n",
    "中文\n🎉x",
];
