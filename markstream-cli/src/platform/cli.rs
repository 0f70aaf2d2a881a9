//! CLI 格式化输出
//!
//! 提供命令行友好的检查结果和源码上下文打印。

use markstream::{Match, Unit, UnitReport};

/// 源码上下文：目标行前后显示的行数
const CONTEXT_LINES: usize = 2;

/// 打印一条检查结果：`index line:column unit [lookahead...]`
pub fn print_report(report: &UnitReport) {
    println!("{}", format_report(report));
}

fn format_report(report: &UnitReport) -> String {
    let p = report.position;
    let mut line = format!("{:>6} {:>4}:{:<4} {}", p.index, p.line, p.column, report.unit);
    if !report.lookahead.is_empty() {
        let ahead: Vec<String> = report.lookahead.iter().map(Unit::to_string).collect();
        line.push_str(&format!("  [{}]", ahead.join(" ")));
    }
    line
}

/// 打印匹配位置及其源码上下文
pub fn print_match(name: &str, m: &Match, source: &str) {
    let p = m.position;
    println!("{}:{}:{}: {:?}", name, p.line, p.column, m.text);
    print!("{}", render_source_context(source, p.line, p.column));
}

/// 渲染源代码上下文，在目标行下方用 `^` 指出列位置
///
/// `line` 从 1 开始，`column` 从 0 开始；行号越界时返回空串
pub fn render_source_context(source: &str, line: usize, column: usize) -> String {
    let lines: Vec<&str> = source.split('\n').collect();
    let total_lines = lines.len();

    if line == 0 || line > total_lines {
        return String::new();
    }

    let start_line = line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (line + CONTEXT_LINES).min(total_lines);

    // 行号的最大宽度用于对齐
    let width = end_line.to_string().len();
    let separator = "-".repeat(width + 1);

    let mut out = format!("{}|--\n", separator);
    for line_idx in start_line..=end_line {
        out.push_str(&format!(
            "{:>width$} | {}\n",
            line_idx,
            lines[line_idx - 1],
            width = width
        ));
        if line_idx == line {
            out.push_str(&format!(
                "{} | {}^\n",
                " ".repeat(width),
                " ".repeat(column)
            ));
        }
    }
    out.push_str(&format!("{}|--\n", separator));
    out
}
