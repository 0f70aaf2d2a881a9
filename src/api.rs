//! API 层：字符流之上的扫描操作
//!
//! 输入一个 [`CharStream`]，输出结构化结果，不做任何打印。

use markstream_core::{CharStream, Position, Unit};

/// 单个位置的检查结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    /// 读取前的位置
    pub position: Position,
    /// `lookahead(1)` 看到的单元
    pub unit: Unit,
    /// `lookahead(2..)` 看到的单元
    pub lookahead: Vec<Unit>,
}

/// 一次匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// 匹配起点
    pub position: Position,
    /// 匹配到的原文（未折叠）
    pub text: String,
}

/// 逐单元遍历流，记录每个位置及其后续 `lookahead` 个单元
///
/// 遇到 EOF 或达到 `limit` 时停止。
pub fn inspect<C: CharStream>(
    stream: &mut C,
    lookahead: usize,
    limit: Option<usize>,
) -> Result<Vec<UnitReport>, C::Error> {
    let mut reports = Vec::new();
    loop {
        if limit.is_some_and(|limit| reports.len() >= limit) {
            break;
        }
        let unit = stream.lookahead(1)?.unwrap_or(Unit::Eof);
        if unit == Unit::Eof {
            break;
        }
        let mut ahead = Vec::with_capacity(lookahead);
        for i in 2..=lookahead + 1 {
            ahead.push(stream.lookahead(i)?.unwrap_or(Unit::Eof));
        }
        reports.push(UnitReport {
            position: stream.position(),
            unit,
            lookahead: ahead,
        });
        stream.advance()?;
    }
    tracing::debug!(target: "markstream::cli", units = reports.len(), "inspect finished");
    Ok(reports)
}

/// 按大小写折叠规则处理待查找的词
pub fn fold_word(word: &str, case_fold: bool) -> String {
    if !case_fold {
        return word.to_string();
    }
    word.chars()
        .filter_map(|c| Unit::Char(c).fold_case().as_char())
        .collect()
}

/// 查找 `word` 的所有不重叠出现
///
/// 每个位置都用 `matches_text` 试探，失败时流回到原处再前进一个单元。
/// 大小写折叠开启时 `word` 需先经过 [`fold_word`]。
pub fn find<C: CharStream>(stream: &mut C, word: &str) -> Result<Vec<Match>, C::Error> {
    let mut matches = Vec::new();
    if word.is_empty() {
        return Ok(matches);
    }
    while stream.lookahead(1)? != Some(Unit::Eof) {
        let start = stream.position();
        if stream.matches_text(word)? {
            let text = stream.substring(start.index, stream.index())?;
            tracing::trace!(target: "markstream::cli", at = %start, "match");
            matches.push(Match {
                position: start,
                text,
            });
        } else {
            stream.advance()?;
        }
    }
    Ok(matches)
}
