//! 平台适配层（终端输出）

pub mod cli;

pub use cli::{print_match, print_report, render_source_context};
