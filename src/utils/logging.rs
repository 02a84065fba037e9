/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::config::Config;
use crate::models::{AssessmentResponse, BreakdownCategory, RiskSummary};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`。
/// 重复调用不会报错（测试中多次初始化时直接忽略）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - 患者风险评估 ({})",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 API 地址: {}", config.api_base_url);
    info!(
        "📊 每页 {} 条, 单页最多尝试 {} 次, 提交最多尝试 {} 次",
        config.page_size, config.page_max_attempts, config.submit_max_attempts
    );
    if config.dry_run {
        info!("💡 dry-run 模式：只评估，不提交");
    }
    info!("{}", "=".repeat(60));
}

/// 记录风险统计
pub fn log_risk_summary(summary: &RiskSummary) {
    info!("\n{}", "─".repeat(60));
    info!("📋 风险评估完成: 共 {} 名患者", summary.total_patients);
    info!("🔴 高风险: {}", summary.high_risk);
    info!("🌡️ 发热: {}", summary.fever);
    info!("⚠️ 数据质量问题: {}", summary.data_quality_issues);
    info!("{}", "─".repeat(60));
}

/// 打印提交结果
pub fn log_submission_result(response: &AssessmentResponse) {
    let results = &response.results;

    info!("\n{}", "=".repeat(60));
    info!("📊 提交结果: {}", response.message);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "得分: {} ({}%) - {}",
        results.score, results.percentage, results.status
    );
    log_category("高风险", &results.breakdown.high_risk);
    log_category("发热", &results.breakdown.fever);
    log_category("数据质量", &results.breakdown.data_quality);

    for strength in &results.feedback.strengths {
        info!("✅ {}", strength);
    }
    for issue in &results.feedback.issues {
        warn!("❌ {}", issue);
    }

    info!(
        "第 {} 次提交, 剩余 {} 次{}",
        results.attempt_number,
        results.remaining_attempts,
        if results.is_personal_best {
            " 🏆 个人最佳"
        } else {
            ""
        }
    );
    if !results.can_resubmit {
        warn!("⚠️ 已无法再次提交");
    }
    info!("{}", "=".repeat(60));
}

fn log_category(label: &str, category: &BreakdownCategory) {
    info!(
        "  {}: {}/{} 分, 正确 {}/{}, 提交 {}",
        label, category.score, category.max, category.matches, category.correct, category.submitted
    );
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
