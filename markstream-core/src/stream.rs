//! 字符流
//!
//! 在只支持前向读取和有限回退的后备源之上，提供带位置追踪、
//! 任意预读和嵌套回溯的字符流，供语法分析前端驱动。
//!
//! 预读完全通过"前向读取 i 次再回退 i 次"实现，流自身不缓存文本。

use markstream_config::StreamConfig;
use tracing::{debug, trace};

use crate::marks::{MarkStack, Marker};
use crate::position::{Position, Unit};
use crate::source::BackingSource;

/// 日志目标
const TARGET: &str = "markstream::stream";

/// 语法分析引擎看到的字符流接口
pub trait CharStream {
    /// 后备源错误类型
    type Error;

    /// 消费一个单元
    fn advance(&mut self) -> Result<(), Self::Error>;

    /// 查看前方第 `i` 个单元，不改变位置
    ///
    /// `i == 0` 返回 `None`（未定义）。读取出错时已读的单元会被退回；
    /// 若是回退本身出错，源游标与 `index` 不再一致，流不可继续使用。
    fn lookahead(&mut self, i: usize) -> Result<Option<Unit>, Self::Error>;

    /// 同 [`lookahead`](Self::lookahead)，字符流没有独立的 token 视图
    fn lt(&mut self, i: usize) -> Result<Option<Unit>, Self::Error> {
        self.lookahead(i)
    }

    /// 当前行号（1-based）
    fn line(&self) -> usize;

    /// 覆盖行号，不影响 index
    fn set_line(&mut self, line: usize);

    /// 当前列号（0-based）
    fn column(&self) -> usize;

    /// 覆盖列号，不影响 index
    fn set_column(&mut self, column: usize);

    /// 记录当前位置，返回标记
    fn mark(&mut self) -> Marker;

    /// 回到最近一次打开的标记
    fn rewind(&mut self) -> Result<(), Self::Error>;

    /// 回到 `marker` 保存的位置并释放它
    fn rewind_to(&mut self, marker: Marker) -> Result<(), Self::Error>;

    /// 释放 `marker` 及所有更深的标记，位置不变
    fn release(&mut self, marker: Marker);

    /// 移动到绝对位置 `index`
    fn seek(&mut self, index: usize) -> Result<(), Self::Error>;

    /// 当前绝对位置
    fn index(&self) -> usize;

    /// 绝对区间 `[start, stop)` 的原文
    fn substring(&self, start: usize, stop: usize) -> Result<String, Self::Error>;

    /// 输入总长度，流式来源总是未知
    fn size(&self) -> Option<usize>;

    /// 来源名称
    fn source_name(&self) -> &str;

    /// 当前位置快照
    fn position(&self) -> Position {
        Position::new(self.index(), self.line(), self.column())
    }

    /// 试探性执行 `f`
    ///
    /// - `Ok(Some(v))`：保留新位置，释放标记
    /// - `Ok(None)`：回到执行前的位置
    /// - `Err(e)`：释放标记后返回错误
    fn speculate<T, F>(&mut self, f: F) -> Result<Option<T>, Self::Error>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<Option<T>, Self::Error>,
    {
        let marker = self.mark();
        match f(self) {
            Ok(Some(value)) => {
                self.release(marker);
                Ok(Some(value))
            }
            Ok(None) => {
                if let Err(e) = self.rewind_to(marker) {
                    self.release(marker);
                    return Err(e);
                }
                Ok(None)
            }
            Err(e) => {
                self.release(marker);
                Err(e)
            }
        }
    }

    /// 匹配字面量 `text`，成功则消费，失败不移动
    ///
    /// 比较走 `lookahead`，大小写折叠开启时 `text` 应为小写
    fn matches_text(&mut self, text: &str) -> Result<bool, Self::Error>
    where
        Self: Sized,
    {
        let matched = self.speculate(|stream| {
            for expected in text.chars() {
                if stream.lookahead(1)? != Some(Unit::Char(expected)) {
                    return Ok(None);
                }
                stream.advance()?;
            }
            Ok(Some(()))
        })?;
        Ok(matched.is_some())
    }
}

/// 基于标记栈的字符流实现
///
/// 借用后备源，不负责其生命周期
pub struct MarkedCharStream<'a, S: BackingSource> {
    source: &'a mut S,
    name: String,
    position: Position,
    marks: MarkStack,
    case_fold: bool,
}

impl<'a, S: BackingSource> MarkedCharStream<'a, S> {
    /// 创建字符流
    pub fn new(source: &'a mut S, name: impl Into<String>, case_fold: bool) -> Self {
        let name = name.into();
        debug!(target: TARGET, name = %name, case_fold, "Creating char stream");
        Self {
            source,
            name,
            position: Position::start(),
            marks: MarkStack::new(),
            case_fold,
        }
    }

    /// 按配置创建字符流
    pub fn with_config(source: &'a mut S, config: &StreamConfig) -> Self {
        debug!(
            target: TARGET,
            name = %config.source_name,
            case_fold = config.case_fold,
            mark_capacity = config.mark_capacity,
            "Creating char stream"
        );
        Self {
            source,
            name: config.source_name.clone(),
            position: Position::start(),
            marks: MarkStack::with_capacity(config.mark_capacity),
            case_fold: config.case_fold,
        }
    }

    /// 是否开启大小写折叠
    pub fn case_fold(&self) -> bool {
        self.case_fold
    }

    /// 当前标记深度（0 表示没有活动标记）
    pub fn mark_depth(&self) -> usize {
        self.marks.depth()
    }

    /// 标记当前是否有效
    pub fn is_open(&self, marker: Marker) -> bool {
        self.marks.is_open(marker)
    }

    /// 借用后备源
    pub fn source(&self) -> &S {
        &*self.source
    }
}

impl<S: BackingSource> CharStream for MarkedCharStream<'_, S> {
    type Error = S::Error;

    fn advance(&mut self) -> Result<(), S::Error> {
        let unit = self.source.read_one()?;
        self.position.advance(unit);
        Ok(())
    }

    fn lookahead(&mut self, i: usize) -> Result<Option<Unit>, S::Error> {
        if i == 0 {
            return Ok(None);
        }

        let mut unit = Unit::Eof;
        for read in 0..i {
            match self.source.read_one() {
                Ok(next) => unit = next,
                Err(e) => {
                    // 撤销已成功的读取，源游标回到 index
                    let _ = self.source.backup(read);
                    return Err(e);
                }
            }
        }
        self.source.backup(i)?;

        if self.case_fold {
            Ok(Some(unit.fold_case()))
        } else {
            Ok(Some(unit))
        }
    }

    fn line(&self) -> usize {
        self.position.line
    }

    fn set_line(&mut self, line: usize) {
        self.position.line = line;
    }

    fn column(&self) -> usize {
        self.position.column
    }

    fn set_column(&mut self, column: usize) {
        self.position.column = column;
    }

    fn mark(&mut self) -> Marker {
        let marker = self.marks.open(self.position);
        trace!(target: TARGET, %marker, position = %self.position, "Mark");
        marker
    }

    fn rewind(&mut self) -> Result<(), S::Error> {
        self.rewind_to(self.marks.last_opened())
    }

    fn rewind_to(&mut self, marker: Marker) -> Result<(), S::Error> {
        let saved = self.marks.get(marker);
        trace!(target: TARGET, %marker, from = %self.position, to = %saved, "Rewind");
        self.seek(saved.index)?;
        self.position.line = saved.line;
        self.position.column = saved.column;
        self.release(marker);
        Ok(())
    }

    fn release(&mut self, marker: Marker) {
        trace!(target: TARGET, %marker, "Release");
        self.marks.release(marker);
    }

    fn seek(&mut self, index: usize) -> Result<(), S::Error> {
        if index < self.position.index {
            trace!(target: TARGET, from = self.position.index, to = index, "Seek backward");
            self.source.backup(self.position.index - index)?;
            // 只跳转 index，line/column 保持不变
            self.position.index = index;
            return Ok(());
        }

        while self.position.index < index {
            self.advance()?;
        }
        Ok(())
    }

    fn index(&self) -> usize {
        self.position.index
    }

    fn substring(&self, start: usize, stop: usize) -> Result<String, S::Error> {
        self.source.read_range(start, stop)
    }

    fn size(&self) -> Option<usize> {
        None
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
