//! 重试状态机
//!
//! 每次请求尝试的结果交给 [`RetryPolicy::next`]，由它决定下一个状态：
//! 继续等待后重试、成功返回，或以终止错误结束。等待时长只取决于
//! 尝试序号和响应中的 `Retry-After`，不涉及任何 I/O。

use crate::error::ApiError;
use std::time::Duration;
use tracing::warn;

/// 指数退避的最大指数，避免溢出
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// 重试状态
#[derive(Debug)]
pub enum RetryState<T> {
    /// 即将发起第 `attempt` 次尝试（从 0 开始）
    Attempting { attempt: u32 },
    /// 等待 `delay` 后发起第 `attempt` 次尝试
    Waiting { attempt: u32, delay: Duration },
    /// 成功
    Succeeded(T),
    /// 终止
    Failed(ApiError),
}

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    /// 退避计算中"一秒"的实际时长
    unit: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, unit: Duration) -> Self {
        Self { max_attempts, unit }
    }

    /// 第 `attempt` 次尝试失败后的退避时长：`2^attempt` 个单位
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.unit
            .saturating_mul(1u32 << attempt.min(MAX_BACKOFF_EXPONENT))
    }

    /// 计算等待时长：限流响应带有 `Retry-After` 时按其秒数，否则指数退避
    pub fn delay_for(&self, attempt: u32, error: &ApiError) -> Duration {
        match error {
            ApiError::RateLimited {
                retry_after: Some(secs),
                ..
            } => self
                .unit
                .saturating_mul(u32::try_from(*secs).unwrap_or(u32::MAX)),
            _ => self.backoff_delay(attempt),
        }
    }

    /// 初始状态；最大尝试次数为 0 时直接失败
    pub fn start<T>(&self, endpoint: &str) -> RetryState<T> {
        if self.max_attempts == 0 {
            RetryState::Failed(ApiError::RetryExhausted {
                endpoint: endpoint.to_string(),
                attempts: 0,
            })
        } else {
            RetryState::Attempting { attempt: 0 }
        }
    }

    /// 根据第 `attempt` 次尝试的结果决定下一个状态
    ///
    /// 最后一次尝试失败时：限流转为 `RetryExhausted`，其余错误原样返回。
    pub fn next<T>(&self, attempt: u32, outcome: Result<T, ApiError>) -> RetryState<T> {
        let error = match outcome {
            Ok(value) => return RetryState::Succeeded(value),
            Err(error) => error,
        };

        let is_last = attempt + 1 >= self.max_attempts;
        if is_last {
            return match error {
                ApiError::RateLimited { endpoint, .. } => RetryState::Failed(ApiError::RetryExhausted {
                    endpoint,
                    attempts: self.max_attempts,
                }),
                other => RetryState::Failed(other),
            };
        }

        let delay = self.delay_for(attempt, &error);
        warn!(
            "⚠️ {}，{}ms 后重试 ({}/{}): {}",
            error.kind(),
            delay.as_millis(),
            attempt + 1,
            self.max_attempts,
            error
        );
        RetryState::Waiting {
            attempt: attempt + 1,
            delay,
        }
    }
}
