//! 分页拉取 - 编排层
//!
//! 按顺序拉取第 1..N 页。总页数以第 1 页返回的为准，之后各页
//! 报告的总页数一律忽略。任何一页失败都会中止整个拉取，不返回部分结果。

use crate::clients::AssessmentClient;
use crate::error::AppResult;
use crate::models::Patient;
use tracing::{debug, info};

/// 进度百分比：`min(page / total_pages * 100, 100)`
pub fn progress_percent(page: u32, total_pages: u32) -> f64 {
    if total_pages == 0 {
        return 100.0;
    }
    (f64::from(page) / f64::from(total_pages) * 100.0).min(100.0)
}

/// 拉取全部患者
///
/// # 参数
/// - `client`: 评估服务客户端
/// - `page_size`: 每页数量
/// - `on_progress`: 每拉完一页回调一次进度（0-100，单调不减）
///
/// # 返回
/// 按服务端返回顺序排列的全部患者
pub async fn fetch_all_patients(
    client: &AssessmentClient,
    page_size: u32,
    mut on_progress: Option<&mut (dyn FnMut(f64) + Send)>,
) -> AppResult<Vec<Patient>> {
    let mut all_patients = Vec::new();
    let mut page = 1;
    let mut total_pages = 1;

    while page <= total_pages {
        let envelope = client.fetch_patient_page(page, page_size).await?;

        if page == 1 {
            total_pages = envelope.pagination.total_pages;
        } else if envelope.pagination.total_pages != total_pages {
            debug!(
                "第 {} 页报告总页数 {}，沿用第 1 页的 {}",
                page, envelope.pagination.total_pages, total_pages
            );
        }

        info!(
            "📄 已拉取第 {}/{} 页, 本页 {} 名患者",
            page,
            total_pages,
            envelope.data.len()
        );
        all_patients.extend(envelope.data);

        if let Some(callback) = on_progress.as_deref_mut() {
            callback(progress_percent(page, total_pages));
        }
        page += 1;
    }

    info!("✓ 共拉取 {} 名患者", all_patients.len());
    Ok(all_patients)
}
