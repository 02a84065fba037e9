/// 评估服务 API 客户端
///
/// 封装所有与评估服务相关的端点：分页拉取患者、提交评估结果。
/// 每个实例携带自己的 API Key 和基础地址，互不共享状态。
use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{RequestExecutor, RequestSpec};
use crate::models::{AssessmentResponse, AssessmentResults, PatientPage};
use crate::services::is_valid_patient_page;
use tracing::{debug, info};

pub const PATIENTS_PATH: &str = "/patients";
pub const SUBMIT_PATH: &str = "/submit-assessment";

/// 评估服务客户端
#[derive(Debug, Clone)]
pub struct AssessmentClient {
    executor: RequestExecutor,
    page_max_attempts: u32,
    submit_max_attempts: u32,
}

impl AssessmentClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            executor: RequestExecutor::new(config)?,
            page_max_attempts: config.page_max_attempts,
            submit_max_attempts: config.submit_max_attempts,
        })
    }

    /// 拉取一页患者
    ///
    /// # 参数
    /// - `page`: 页码（从 1 开始）
    /// - `limit`: 每页数量
    pub async fn fetch_patient_page(&self, page: u32, limit: u32) -> AppResult<PatientPage> {
        let spec = RequestSpec::get(PATIENTS_PATH)
            .query("page", page)
            .query("limit", limit);

        debug!("拉取患者第 {} 页 (每页 {} 条)", page, limit);

        self.executor
            .execute(&spec, self.page_max_attempts, Some(is_valid_patient_page))
            .await
    }

    /// 提交评估结果
    ///
    /// # 返回
    /// 原样返回服务端评分
    pub async fn submit_assessment(
        &self,
        results: &AssessmentResults,
    ) -> AppResult<AssessmentResponse> {
        let spec = RequestSpec::post_json(SUBMIT_PATH, serde_json::to_value(results)?);

        info!(
            "📋 提交评估: 高风险 {} / 发热 {} / 数据质量问题 {}",
            results.high_risk_patients.len(),
            results.fever_patients.len(),
            results.data_quality_issues.len()
        );

        self.executor
            .execute(&spec, self.submit_max_attempts, None)
            .await
    }
}
