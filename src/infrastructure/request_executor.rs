//! 带重试的请求执行器 - 基础设施层
//!
//! 唯一持有 HTTP 连接池和 API Key 的组件，只暴露"发一个请求并按策略重试"的能力。

use crate::config::Config;
use crate::error::{ApiError, AppResult};
use crate::infrastructure::retry::{RetryPolicy, RetryState};
use crate::utils::logging::truncate_text;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// API Key 请求头
pub const API_KEY_HEADER: &str = "x-api-key";

/// 响应数据校验函数
pub type Validator = fn(&JsonValue) -> bool;

/// 一次请求的描述
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<JsonValue>,
}

impl RequestSpec {
    /// GET 请求
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// 携带 JSON 请求体的 POST 请求
    pub fn post_json(path: impl Into<String>, body: JsonValue) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// 追加查询参数
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// 用于日志和错误信息的端点描述
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// 带重试的请求执行器
///
/// 没有跨调用的可变状态，可以被多个任务同时使用。
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    backoff_unit: Duration,
}

impl RequestExecutor {
    /// 根据配置创建执行器
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            backoff_unit: config.backoff_unit(),
        })
    }

    /// 执行请求
    ///
    /// # 参数
    /// - `spec`: 请求描述
    /// - `max_attempts`: 最大尝试次数
    /// - `validator`: 可选的响应数据校验函数，返回 false 时按软失败重试
    ///
    /// # 返回
    /// 返回校验通过并解码后的响应体，或终止错误
    pub async fn execute<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        max_attempts: u32,
        validator: Option<Validator>,
    ) -> AppResult<T> {
        let endpoint = spec.endpoint();
        let policy = RetryPolicy::new(max_attempts, self.backoff_unit);
        let mut state = policy.start(&endpoint);

        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    debug!("请求 {} (尝试 {}/{})", endpoint, attempt + 1, max_attempts);
                    let outcome = self.attempt(spec, &endpoint, validator).await;
                    policy.next(attempt, outcome)
                }
                RetryState::Waiting { attempt, delay } => {
                    sleep(delay).await;
                    RetryState::Attempting { attempt }
                }
                RetryState::Succeeded(value) => return Ok(value),
                RetryState::Failed(error) => return Err(error.into()),
            };
        }
    }

    /// 单次尝试：把 HTTP 层的各种情况归类为成功或某种 `ApiError`
    async fn attempt<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        endpoint: &str,
        validator: Option<Validator>,
    ) -> Result<T, ApiError> {
        let response = self
            .build_request(spec)
            .send()
            .await
            .map_err(|e| ApiError::transport(endpoint, e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited {
                endpoint: endpoint.to_string(),
                retry_after: parse_retry_after(response.headers()),
            });
        }
        if status.is_server_error() {
            return Err(ApiError::ServerError {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(endpoint, e))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes);
            return Err(ApiError::validation(
                endpoint,
                format!("意外的状态码 {}: {}", status, truncate_text(&text, 200)),
            ));
        }

        let body: JsonValue =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::transport(endpoint, e))?;

        if let Some(validate) = validator {
            if !validate(&body) {
                debug!("校验失败的响应: {}", truncate_text(&body.to_string(), 200));
                return Err(ApiError::validation(endpoint, "响应数据结构不符合预期"));
            }
        }

        serde_json::from_value(body).map_err(|e| ApiError::transport(endpoint, e))
    }

    fn build_request(&self, spec: &RequestSpec) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, spec.path);
        let mut request = self
            .http
            .request(spec.method.clone(), url)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key);

        if !spec.query.is_empty() {
            request = request.query(&spec.query);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }
        request
    }
}

/// 解析 `Retry-After` 头，只取开头的整数秒（"2.5" 视为 2）；缺失或不以数字开头时返回 None
pub fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(RETRY_AFTER)?.to_str().ok()?.trim();
    let digits_end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..digits_end].parse().ok()
}
