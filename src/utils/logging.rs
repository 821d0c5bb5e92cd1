//! 日志工具模块
//!
//! 提供日志初始化、格式化和输出的辅助函数

use crate::models::AggregateSummary;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；否则 verbose 时为 debug，默认 info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(command: &str, root: &std::path::Path) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {}", command);
    info!("📁 候选人根目录: {}", root.display());
    info!("{}", "=".repeat(60));
}

/// 打印成绩汇总（控制台输出）
pub fn print_grading_summary(summary: &AggregateSummary) {
    println!("\n=== Summary ===");
    println!("Total candidates evaluated: {}", summary.total_candidates);
    println!("Total points awarded: {}", summary.total_points);
    println!("Average points per candidate: {:.2}", summary.mean_grade);
    println!(
        "Passed candidates: {} ({:.1}%)",
        summary.passed_count,
        summary.pass_rate().unwrap_or(0.0)
    );
    println!(
        "Failed candidates: {} ({:.1}%)",
        summary.failed_count,
        summary.fail_rate().unwrap_or(0.0)
    );
}

/// 打印反馈生成统计
///
/// # 参数
/// - `processed`: 新生成反馈的数量
/// - `skipped`: 已有反馈而跳过的数量
/// - `missing`: 缺少报告文件而跳过的数量
/// - `failed`: 失败数量
pub fn print_feedback_summary(processed: usize, skipped: usize, missing: usize, failed: usize) {
    info!("\n{}", "=".repeat(60));
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    println!("\n{}", format_feedback_summary(processed, skipped, missing, failed));
}

/// 反馈统计的控制台文本，计数为 0 的行省略
pub fn format_feedback_summary(processed: usize, skipped: usize, missing: usize, failed: usize) -> String {
    let mut lines = vec![format!(
        "Process complete! Generated feedback for {} candidate(s).",
        processed
    )];
    if skipped > 0 {
        lines.push(format!("Skipped {} candidate(s) with existing feedback.", skipped));
    }
    if missing > 0 {
        lines.push(format!("Skipped {} candidate(s) without a report.", missing));
    }
    if failed > 0 {
        lines.push(format!("Failed to generate feedback for {} candidate(s).", failed));
    }
    lines.join("\n")
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("abc", 3), "abc");
        assert_eq!(truncate_text("评估报告内容", 2), "评估...");
    }

    #[test]
    fn test_feedback_summary_lists_missing_reports() {
        let text = format_feedback_summary(2, 1, 3, 0);
        assert_eq!(
            text,
            "Process complete! Generated feedback for 2 candidate(s).\n\
             Skipped 1 candidate(s) with existing feedback.\n\
             Skipped 3 candidate(s) without a report."
        );
    }

    #[test]
    fn test_feedback_summary_omits_zero_counts() {
        assert_eq!(
            format_feedback_summary(0, 0, 0, 0),
            "Process complete! Generated feedback for 0 candidate(s)."
        );
    }
}
