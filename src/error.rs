use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// API 调用错误
///
/// 除 `RetryExhausted` 外，每个变体既可以是一次尝试的结果（由重试策略决定是否重试），
/// 也可以是最后一次尝试后的终止错误。
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求或响应解码失败
    #[error("API请求失败 ({endpoint}): {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 请求频率限制（429）
    #[error("API请求频率限制 ({endpoint}), 建议等待: {retry_after:?}秒")]
    RateLimited {
        endpoint: String,
        retry_after: Option<u64>,
    },
    /// 服务端错误（5xx）
    #[error("服务端错误 ({endpoint}): {status} {status_text}")]
    ServerError {
        endpoint: String,
        status: u16,
        status_text: String,
    },
    /// 响应数据结构不符合预期
    #[error("响应数据校验失败 ({endpoint}): {reason}")]
    ValidationFailure { endpoint: String, reason: String },
    /// 所有尝试均未成功
    #[error("请求 {endpoint} 在 {attempts} 次尝试后仍未成功")]
    RetryExhausted { endpoint: String, attempts: u32 },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必填配置缺失或非法
    #[error("配置项 {name} 无效: {reason}")]
    InvalidValue { name: String, reason: String },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::Transport {
            endpoint: String::new(), // 解码错误本身不携带端点信息
            source: Box::new(err),
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err.url().map(|u| u.to_string()).unwrap_or_default();
        AppError::Api(ApiError::Transport {
            endpoint,
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl ApiError {
    /// 创建网络/解码失败错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::Transport {
            endpoint: endpoint.into(),
            source: Box::new(source),
        }
    }

    /// 创建数据校验失败错误
    pub fn validation(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        ApiError::ValidationFailure {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// 简短的错误类别，用于重试日志
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } => "请求失败",
            ApiError::RateLimited { .. } => "请求频率限制",
            ApiError::ServerError { .. } => "服务端错误",
            ApiError::ValidationFailure { .. } => "数据校验失败",
            ApiError::RetryExhausted { .. } => "重试次数耗尽",
        }
    }
}

impl ConfigError {
    /// 创建配置项非法错误
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
