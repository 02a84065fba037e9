//! 应用入口 - 编排层
//!
//! 负责初始化、运行一次评估流程并输出统计。

use crate::config::Config;
use crate::utils::logging::{log_risk_summary, log_startup, log_submission_result};
use crate::workflow::{AssessmentFlow, AssessmentOutcome};
use anyhow::Result;
use tracing::{debug, error, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: AssessmentFlow,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);
        let flow = AssessmentFlow::new(&config)?;
        Ok(Self { config, flow })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<AssessmentOutcome> {
        let mut report_progress = |percent: f64| debug!("拉取进度: {:.0}%", percent);

        let outcome = match self.flow.run(Some(&mut report_progress)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("❌ 评估流程失败: {}", e);
                return Err(e.into());
            }
        };

        if outcome.patients.is_empty() {
            warn!("⚠️ 服务端没有返回任何患者");
        }
        log_risk_summary(&outcome.summary());

        match &outcome.response {
            Some(response) => log_submission_result(response),
            None if self.config.dry_run => {}
            None => warn!("⚠️ 没有收到提交结果"),
        }

        Ok(outcome)
    }
}
