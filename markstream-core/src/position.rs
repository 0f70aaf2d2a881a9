//! 源代码位置追踪
//!
//! 三个坐标：
//! - index: 从流起点开始的绝对单元偏移（0-based）
//! - line: 行号（1-based）
//! - column: 行内偏移（0-based）

use std::fmt;

/// 行终止符
pub const LINE_TERMINATOR: char = '\n';

/// 后备源产生的一个单元
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// 普通字符
    Char(char),
    /// 输入结束哨兵
    Eof,
}

impl Unit {
    /// 是否为行终止符
    pub fn is_line_terminator(self) -> bool {
        self == Unit::Char(LINE_TERMINATOR)
    }

    /// 取出字符（EOF 返回 None）
    pub fn as_char(self) -> Option<char> {
        match self {
            Unit::Char(c) => Some(c),
            Unit::Eof => None,
        }
    }

    /// 大小写折叠：字母转小写，其余原样返回
    ///
    /// 多字符映射只取第一个字符（'İ' -> 'i'）
    pub fn fold_case(self) -> Self {
        match self {
            Unit::Char(c) if c.is_alphabetic() => {
                Unit::Char(c.to_lowercase().next().unwrap_or(c))
            }
            other => other,
        }
    }
}

impl From<char> for Unit {
    fn from(c: char) -> Self {
        Unit::Char(c)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Char(c) => write!(f, "{:?}", c),
            Unit::Eof => write!(f, "<EOF>"),
        }
    }
}

/// 流位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// 绝对单元偏移，0-based
    pub index: usize,
    /// 行号，1-based
    pub line: usize,
    /// 行内偏移，0-based
    pub column: usize,
}

impl Position {
    /// 创建新位置
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    /// 流起始位置
    pub fn start() -> Self {
        Self {
            index: 0,
            line: 1,
            column: 0,
        }
    }

    /// 越过一个已消费的单元
    ///
    /// EOF 也算一个单元：index 与 column 照常前进
    pub fn advance(&mut self, unit: Unit) {
        self.index += 1;
        if unit.is_line_terminator() {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.line, self.column, self.index)
    }
}
