//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `pagination` - 分页拉取
//! - 顺序拉取第 1..N 页，累加患者记录
//! - 第 1 页决定总页数
//! - 每页完成后回调进度
//!
//! ### `app` - 应用入口
//! - 初始化配置和客户端
//! - 运行一次评估流程
//! - 输出风险统计和提交结果
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! workflow::AssessmentFlow (拉取 → 评估 → 提交)
//!     ↓
//! pagination / services (能力层：校验 / 评估 / 构建提交)
//!     ↓
//! clients → infrastructure (RequestExecutor)
//! ```

pub mod app;
pub mod pagination;

pub use app::App;
pub use pagination::{fetch_all_patients, progress_percent};
