use super::patient::{lenient_opt_string, Patient};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// 一页患者数据
///
/// 只有 `data` 和 `pagination.totalPages` 是必需的（与分页校验一致），
/// 其余字段宽松解析：null 或类型不符都当作缺失。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientPage {
    pub data: Vec<Patient>,
    pub pagination: Pagination,
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: Option<ResponseMetadata>,
}

/// 分页信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub limit: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub total: Option<u32>,
    pub total_pages: u32,
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub has_next: Option<bool>,
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    pub has_previous: Option<bool>,
}

/// 响应元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub request_id: Option<String>,
}

fn lenient_opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(JsonValue::deserialize(deserializer)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok()))
}

fn lenient_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(JsonValue::deserialize(deserializer)?.as_bool())
}

fn lenient_metadata<'de, D>(deserializer: D) -> Result<Option<ResponseMetadata>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::from_value(JsonValue::deserialize(deserializer)?).ok())
}
