//! 标记栈（回溯支持）
//!
//! 按深度索引的保存点集合。深度 0 保留不用（表示"无回溯"），
//! 槽位在构造时就存在，之后按需增长并复用。

use std::fmt;

use crate::position::Position;

/// 标记标识符
///
/// 深度即标识符，总是 >= 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marker(usize);

impl Marker {
    /// 标记所在深度
    pub fn depth(self) -> usize {
        self.0
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 标记栈
#[derive(Debug, Clone)]
pub struct MarkStack {
    /// slots[0] 是保留槽
    slots: Vec<Position>,
    /// 当前深度（0 表示没有活动标记）
    depth: usize,
    /// 最近一次打开的深度
    last: usize,
}

impl MarkStack {
    /// 创建空标记栈
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// 预先分配 `capacity` 层嵌套所需的槽位
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Position::start(); capacity + 1],
            depth: 0,
            last: 0,
        }
    }

    /// 打开新标记，记录 `position`
    pub fn open(&mut self, position: Position) -> Marker {
        self.depth += 1;
        if self.depth == self.slots.len() {
            self.slots.push(position);
        } else {
            self.slots[self.depth] = position;
        }
        self.last = self.depth;
        Marker(self.depth)
    }

    /// 读取标记保存的位置
    pub fn get(&self, marker: Marker) -> Position {
        self.check_open(marker);
        self.slots[marker.0]
    }

    /// 丢弃 `marker` 及所有更深的标记
    pub fn release(&mut self, marker: Marker) {
        self.check_open(marker);
        self.depth = marker.0.saturating_sub(1);
    }

    /// 最近一次打开的标记
    ///
    /// 即使它之后已被释放也照样返回，调用方负责保证有效
    pub fn last_opened(&self) -> Marker {
        Marker(self.last)
    }

    /// 当前深度
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 已分配的槽位数（不含保留槽）
    pub fn allocated(&self) -> usize {
        self.slots.len() - 1
    }

    /// 标记当前是否有效
    pub fn is_open(&self, marker: Marker) -> bool {
        marker.0 >= 1 && marker.0 <= self.depth
    }

    #[inline]
    fn check_open(&self, marker: Marker) {
        debug_assert!(
            self.is_open(marker),
            "mark {} is not open (depth {})",
            marker,
            self.depth
        );
    }
}

impl Default for MarkStack {
    fn default() -> Self {
        Self::new()
    }
}
