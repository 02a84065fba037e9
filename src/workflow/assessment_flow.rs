//! 评估流程 - 流程层
//!
//! 核心职责：定义一次"拉取 → 评估 → 提交"的完整流程
//!
//! 流程顺序：
//! 1. 分页拉取全部患者
//! 2. 逐个评估风险（保持输入顺序）
//! 3. 构建提交数据并提交（dry-run 时跳过）

use crate::clients::AssessmentClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{AssessmentResponse, Patient, RiskAssessment, RiskSummary};
use crate::orchestrator::pagination::fetch_all_patients;
use crate::services::{assess_all, build_assessment_results, summarize};
use tracing::info;

/// 一次流程的产出，供展示层使用
#[derive(Debug, Clone)]
pub struct AssessmentOutcome {
    /// 按服务端顺序排列的患者
    pub patients: Vec<Patient>,
    /// 与 `patients` 一一对应的评估结果
    pub assessments: Vec<RiskAssessment>,
    /// 服务端评分；dry-run 时为 None
    pub response: Option<AssessmentResponse>,
}

impl AssessmentOutcome {
    /// 按患者 ID 查找评估结果
    pub fn assessment_for(&self, patient_id: &str) -> Option<&RiskAssessment> {
        self.assessments.iter().find(|a| a.patient_id == patient_id)
    }

    pub fn summary(&self) -> RiskSummary {
        summarize(&self.assessments)
    }
}

/// 评估流程
///
/// - 不持有 HTTP 资源以外的任何状态
/// - 每次 `run` 自带累加器和提交数据，多次运行互不影响
pub struct AssessmentFlow {
    client: AssessmentClient,
    page_size: u32,
    dry_run: bool,
}

impl AssessmentFlow {
    /// 创建新的评估流程
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self::with_client(
            AssessmentClient::new(config)?,
            config.page_size,
            config.dry_run,
        ))
    }

    pub fn with_client(client: AssessmentClient, page_size: u32, dry_run: bool) -> Self {
        Self {
            client,
            page_size,
            dry_run,
        }
    }

    /// 执行完整流程
    ///
    /// # 参数
    /// - `on_progress`: 拉取进度回调（0-100）
    pub async fn run(
        &self,
        on_progress: Option<&mut (dyn FnMut(f64) + Send)>,
    ) -> AppResult<AssessmentOutcome> {
        // ========== 步骤 1: 拉取 ==========
        let patients = fetch_all_patients(&self.client, self.page_size, on_progress).await?;

        // ========== 步骤 2: 评估 ==========
        let assessments = assess_all(&patients);

        // ========== 步骤 3: 提交 ==========
        let response = if self.dry_run {
            info!("💡 dry-run 模式，跳过提交");
            None
        } else {
            let results = build_assessment_results(&assessments);
            Some(self.client.submit_assessment(&results).await?)
        };

        Ok(AssessmentOutcome {
            patients,
            assessments,
            response,
        })
    }
}
