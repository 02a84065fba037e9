//! # Patient Risk Assessment
//!
//! 从评估服务分页拉取患者记录，按血压、体温、年龄三个维度评估风险，
//! 再把分类结果提交回服务端评分。
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有 HTTP 连接池和 API Key，只暴露能力
//! - `RequestExecutor` - 发送请求，按重试状态机处理 429 / 5xx / 校验失败 / 网络错误
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/validator` - 分页响应结构校验
//! - `services/risk_calculator` - 单个患者的风险评估（纯函数）
//! - `services/submission_builder` - 按分类构建提交数据
//! - `clients/AssessmentClient` - 患者分页和提交两个端点
//!
//! ### ③ 流程层（Workflow）
//! - `AssessmentFlow` - 拉取 → 评估 → 提交
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pagination` - 顺序分页拉取，回调进度
//! - `orchestrator/app` - 应用入口，输出统计
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::AssessmentClient;
pub use config::Config;
pub use error::{ApiError, AppError, AppResult, ConfigError};
pub use infrastructure::{RequestExecutor, RequestSpec};
pub use models::{AssessmentResponse, AssessmentResults, Patient, RiskAssessment};
pub use orchestrator::{fetch_all_patients, App};
pub use services::{build_assessment_results, calculate_risk_assessment};
pub use workflow::{AssessmentFlow, AssessmentOutcome};
