/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;
use crate::models::ReviewSummary;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 SOE Survey 启动");
    info!("📮 提交方式: {:?} ({})", config.submission_mode, config.submit_endpoint);
    info!("💾 本地存储: {}", config.storage_file);
    info!("🧭 轨道策略: {:?}", config.track_policy);
    info!("{}", "=".repeat(60));
}

/// 记录当前题目
///
/// # 参数
/// - `index`: 题目索引（从 0 开始）
/// - `total`: 题目总数
/// - `prompt`: 题干
pub fn log_question(index: usize, total: usize, prompt: &str) {
    info!("📝 题目 {}/{}: {}", index + 1, total, truncate_text(prompt, 60));
}

/// 打印审阅统计
pub fn log_review_summary(summary: &ReviewSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 问卷统计");
    info!("{}", "=".repeat(60));
    info!("总回复数: {}", summary.total);
    info!("Beginner/Intermediate: {}", summary.beginner);
    info!("Expert/Pro: {}", summary.expert);
    info!(
        "最新回复: {}",
        summary.latest_completed_at.as_deref().unwrap_or("暂无数据")
    );
    info!("{}", "=".repeat(60));
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
