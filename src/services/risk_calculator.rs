//! 风险评估 - 业务能力层
//!
//! 纯函数：一条患者记录 → 各维度风险分。不做 I/O，不持有状态，
//! 任何缺失或格式错误的输入都降级为 [`INVALID_SCORE`]，从不返回错误。

use crate::models::{FieldValue, Patient, RiskAssessment, INVALID_SCORE};
use regex::Regex;
use std::sync::OnceLock;

/// 血压读数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

impl BloodPressure {
    /// 解析 "收缩压/舒张压"，两半都必须是数字
    pub fn parse(reading: &str) -> Option<Self> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        let pattern = PATTERN
            .get_or_init(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)\s*$").ok())
            .as_ref()?;

        let caps = pattern.captures(reading)?;
        let systolic = caps.get(1)?.as_str().parse().ok()?;
        let diastolic = caps.get(2)?.as_str().parse().ok()?;
        Some(Self {
            systolic,
            diastolic,
        })
    }
}

/// 评估单个患者
pub fn calculate_risk_assessment(patient: &Patient) -> RiskAssessment {
    let bp_risk = blood_pressure_risk(patient.blood_pressure.as_ref());
    let temp_risk = temperature_risk(patient.temperature.as_ref());
    let age_risk = age_risk(patient.age.as_ref());

    let scores = [bp_risk, temp_risk, age_risk];
    // 无效维度不计入总分，只影响数据质量标记
    let total_risk = scores.iter().filter(|s| **s > 0).map(|s| *s as u8).sum();

    RiskAssessment {
        patient_id: patient.patient_id.clone(),
        bp_risk,
        temp_risk,
        age_risk,
        total_risk,
        has_data_quality_issues: scores.contains(&INVALID_SCORE),
        has_fever: temp_risk >= 1,
    }
}

/// 按输入顺序评估所有患者
pub fn assess_all(patients: &[Patient]) -> Vec<RiskAssessment> {
    patients.iter().map(calculate_risk_assessment).collect()
}

/// 血压风险：0 正常, 1 偏高, 2 一期高血压, 3 二期高血压
pub fn blood_pressure_risk(value: Option<&FieldValue>) -> i8 {
    let Some(bp) = value
        .and_then(FieldValue::as_text)
        .and_then(BloodPressure::parse)
    else {
        return INVALID_SCORE;
    };
    let (s, d) = (bp.systolic, bp.diastolic);

    if s >= 140.0 || d >= 90.0 {
        3
    } else if (130.0..=139.0).contains(&s) || (80.0..=89.0).contains(&d) {
        2
    } else if (120.0..=129.0).contains(&s) && d < 80.0 {
        1
    } else {
        0
    }
}

/// 体温风险（华氏度）：0 正常, 1 低烧, 2 高烧
pub fn temperature_risk(value: Option<&FieldValue>) -> i8 {
    let Some(temp) = value.and_then(FieldValue::as_number) else {
        return INVALID_SCORE;
    };

    if temp >= 101.0 {
        2
    } else if (99.6..=100.9).contains(&temp) {
        1
    } else {
        0
    }
}

/// 年龄风险：0 40岁以下, 1 40-65岁, 2 65岁以上
pub fn age_risk(value: Option<&FieldValue>) -> i8 {
    let Some(age) = value.and_then(FieldValue::as_number) else {
        return INVALID_SCORE;
    };

    if age > 65.0 {
        2
    } else if (40.0..=65.0).contains(&age) {
        1
    } else {
        0
    }
}
