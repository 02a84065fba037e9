//! 响应数据校验

use serde_json::Value as JsonValue;

/// 检查患者分页响应的结构
///
/// 要求：`data` 是数组（可以为空），`pagination.totalPages` 是能放进 u32 的非负整数。
pub fn is_valid_patient_page(body: &JsonValue) -> bool {
    let has_records = body.get("data").map_or(false, JsonValue::is_array);
    let has_total_pages = body
        .get("pagination")
        .and_then(|p| p.get("totalPages"))
        .and_then(JsonValue::as_u64)
        .map_or(false, |n| u32::try_from(n).is_ok());
    has_records && has_total_pages
}
