//! 提交数据构建
//!
//! 把评估结果按分类拆成三组患者 ID。同一个患者可以同时出现在多组中。

use crate::models::{AssessmentResults, RiskAssessment, RiskSummary};

/// 总分达到该值即视为高风险
pub const HIGH_RISK_THRESHOLD: u8 = 4;

pub fn is_high_risk(assessment: &RiskAssessment) -> bool {
    assessment.total_risk >= HIGH_RISK_THRESHOLD
}

/// 构建提交数据，各组内保持评估结果的原始顺序
pub fn build_assessment_results(assessments: &[RiskAssessment]) -> AssessmentResults {
    let ids_where = |pred: fn(&RiskAssessment) -> bool| -> Vec<String> {
        assessments
            .iter()
            .filter(|a| pred(a))
            .map(|a| a.patient_id.clone())
            .collect()
    };

    AssessmentResults {
        high_risk_patients: ids_where(is_high_risk),
        fever_patients: ids_where(|a| a.has_fever),
        data_quality_issues: ids_where(|a| a.has_data_quality_issues),
    }
}

/// 统计各分类人数
pub fn summarize(assessments: &[RiskAssessment]) -> RiskSummary {
    RiskSummary {
        total_patients: assessments.len(),
        high_risk: assessments.iter().filter(|a| is_high_risk(a)).count(),
        fever: assessments.iter().filter(|a| a.has_fever).count(),
        data_quality_issues: assessments
            .iter()
            .filter(|a| a.has_data_quality_issues)
            .count(),
    }
}
