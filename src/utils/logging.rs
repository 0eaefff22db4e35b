use anyhow::Result;
/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::fs;
use std::io::Write;
use tracing::info;

use crate::config::Config;
use crate::orchestrator::{OutcomeKind, QueueStats, SubmissionReport};

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n文件处理日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 向日志文件追加一行
pub fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;
    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%H:%M:%S"),
        line
    )?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 文件遮盖 / 加解密模式");
    info!("🧭 处理模式: {}", config.mode);
    info!("🌐 服务地址: {}", config.api_base_url);
    info!("📁 输入目录: {}", config.input_folder);
    info!("{}", "=".repeat(60));
}

/// 记录文件加载信息
///
/// # 参数
/// - `total`: 文件总数
/// - `needs_analysis`: 当前模式是否需要先分析
pub fn log_files_loaded(total: usize, needs_analysis: bool) {
    info!("✓ 找到 {} 个待处理的文件", total);
    if needs_analysis {
        info!("📋 将逐个分析字段后再提交");
    } else {
        info!("🔑 加解密模式，跳过分析直接提交");
    }
}

/// 记录分析队列统计
pub fn log_analysis_complete(stats: &QueueStats) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 分析完成: 成功 {}/{}，失败 {}",
        stats.applied,
        stats.total(),
        stats.failed
    );
    info!("{}", "─".repeat(60));
}

/// 打印提交统计
pub fn print_submission_summary(report: &SubmissionReport, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 提交完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    for outcome in &report.outcomes {
        let label = match &outcome.kind {
            OutcomeKind::Succeeded(_) => "✅ 成功".to_string(),
            OutcomeKind::Failed(e) => format!("❌ 失败: {}", truncate_text(&e.to_string(), 80)),
            OutcomeKind::NotAttempted => "⏭️ 未提交".to_string(),
        };
        info!("  #{} {} - {}", outcome.index, outcome.name, label);
    }
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.succeeded(), report.outcomes.len());
    info!("❌ 失败: {}", report.failed().count());
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
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
