//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和源码上下文打印。

use crate::error::CliError;

/// 错误行前后显示的上下文行数
const CONTEXT_LINES: usize = 2;

/// 打印错误并显示源代码上下文
pub fn print_error_with_source(e: &CliError, source: &str) {
    eprintln!("error: {e}");

    if let Some(position) = e.position() {
        eprintln!("  at {position}");
        eprint!("{}", render_source_context(source, position.line, position.column));
    }
}

/// 渲染错误行及其上下文，错误列下方标记 `^`
pub fn render_source_context(source: &str, error_line: usize, error_col: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    // 位置可以落在最后一个换行之后
    let total_lines = lines.len().max(1);

    if error_line == 0 || error_line > total_lines {
        return String::new();
    }

    let start_line = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (error_line + CONTEXT_LINES).min(total_lines);
    let width = end_line.to_string().len();

    let mut out = String::new();
    for line_idx in start_line..=end_line {
        let content = lines.get(line_idx - 1).copied().unwrap_or("");
        out.push_str(&format!("{line_idx:>width$} | {content}\n"));
        if line_idx == error_line {
            let marker = " ".repeat(error_col.saturating_sub(1));
            out.push_str(&format!("{:width$} | {marker}^\n", ""));
        }
    }
    out
}
