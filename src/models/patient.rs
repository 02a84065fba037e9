use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

/// 来自外部接口、类型不可信的字段值
///
/// 数值字段既可能是数字，也可能是数字形式的字符串，也可能是别的任何东西。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(JsonValue),
}

impl FieldValue {
    /// 解析为有限数值；空串、非数字、NaN/无穷都视为无效
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return None;
                }
                trimmed.parse::<f64>().ok()?
            }
            FieldValue::Other(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// 只有字符串才返回文本
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// 患者记录
///
/// 评分所需的字段（年龄、血压、体温）不保证存在或格式正确，
/// 描述性字段只做展示用，宽松解析。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default, deserialize_with = "lenient_string")]
    pub patient_id: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub gender: Option<String>,
    #[serde(default)]
    pub blood_pressure: Option<FieldValue>,
    #[serde(default)]
    pub temperature: Option<FieldValue>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub visit_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub diagnosis: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub medications: Option<String>,
}

fn scalar_to_string(value: JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_to_string(JsonValue::deserialize(deserializer)?))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}
