use serde::{Deserialize, Serialize};

/// 单个维度无法评估（缺失或格式错误）时的标记值
pub const INVALID_SCORE: i8 = -1;

/// 单个患者的风险评估结果
///
/// 每条患者记录生成一次，之后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub patient_id: String,
    #[serde(rename = "bpRisk")]
    pub bp_risk: i8,
    #[serde(rename = "tempRisk")]
    pub temp_risk: i8,
    #[serde(rename = "ageRisk")]
    pub age_risk: i8,
    #[serde(rename = "totalRisk")]
    pub total_risk: u8,
    #[serde(rename = "hasDataQualityIssues")]
    pub has_data_quality_issues: bool,
    #[serde(rename = "hasFever")]
    pub has_fever: bool,
}

/// 提交给评分接口的三组患者 ID
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResults {
    pub high_risk_patients: Vec<String>,
    pub fever_patients: Vec<String>,
    pub data_quality_issues: Vec<String>,
}

/// 各分类的人数统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RiskSummary {
    pub total_patients: usize,
    pub high_risk: usize,
    pub fever: usize,
    pub data_quality_issues: usize,
}

/// 评分接口返回的结果，客户端只读不改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub results: ScoredResults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResults {
    pub score: f64,
    pub percentage: f64,
    pub status: String,
    pub breakdown: ScoreBreakdown,
    #[serde(default)]
    pub feedback: Feedback,
    #[serde(default)]
    pub attempt_number: u32,
    #[serde(default)]
    pub remaining_attempts: u32,
    #[serde(default)]
    pub is_personal_best: bool,
    #[serde(default)]
    pub can_resubmit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub high_risk: BreakdownCategory,
    pub fever: BreakdownCategory,
    pub data_quality: BreakdownCategory,
}

/// 单个分类的得分明细
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownCategory {
    pub score: f64,
    pub max: f64,
    pub correct: u32,
    pub submitted: u32,
    pub matches: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub issues: Vec<String>,
}
