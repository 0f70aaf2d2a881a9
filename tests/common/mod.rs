//! 测试辅助工具
//!
//! 提供端到端测试的辅助函数

#![allow(dead_code)]

use std::path::PathBuf;

/// 在临时目录写入一个测试文件，返回其路径
///
/// 文件名带上进程号，避免并行测试互相覆盖
pub fn write_temp_file(name: &str, content: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("markstream-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).expect("write temp file");
    path
}

/// 一段典型的规则文件
pub const RULE_FILE: &str = "rule \"R1\"\nwhen\n  $p : Person( age > 18 )\nthen\n  adult($p);\nend\n";
