use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// 配置文件路径所在的环境变量
pub const CONFIG_FILE_ENV: &str = "ASSESSMENT_CONFIG";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 评估服务 API 基础 URL
    pub api_base_url: String,
    /// 会话 API Key（通过 `x-api-key` 请求头发送）
    pub api_key: String,
    /// 每页拉取的患者数量
    pub page_size: u32,
    /// 单页请求的最大尝试次数
    pub page_max_attempts: u32,
    /// 提交评估结果的最大尝试次数
    pub submit_max_attempts: u32,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 退避计算中"一秒"的实际时长（毫秒）
    pub backoff_unit_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 只拉取和评估，不提交
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://assessment.ksensetech.com/api".to_string(),
            api_key: String::new(),
            page_size: 10,
            page_max_attempts: 10,
            submit_max_attempts: 3,
            request_timeout_secs: 30,
            backoff_unit_ms: 1000,
            verbose_logging: false,
            dry_run: false,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量，最后校验
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|name| std::env::var(name).ok())
    }

    /// 按给定的环境变量查询函数加载配置
    ///
    /// # 参数
    /// - `lookup`: 环境变量查询函数，`ASSESSMENT_CONFIG` 也经由它读取
    pub fn load_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(CONFIG_FILE_ENV) {
            Some(path) if !path.trim().is_empty() => Self::from_toml_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        config.apply_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，未出现的字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖已有配置
    ///
    /// # 参数
    /// - `lookup`: 环境变量查询函数，便于测试时注入
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = lookup("API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = parse_env(&lookup, "PAGE_SIZE", "u32")? {
            self.page_size = v;
        }
        if let Some(v) = parse_env(&lookup, "PAGE_MAX_ATTEMPTS", "u32")? {
            self.page_max_attempts = v;
        }
        if let Some(v) = parse_env(&lookup, "SUBMIT_MAX_ATTEMPTS", "u32")? {
            self.submit_max_attempts = v;
        }
        if let Some(v) = parse_env(&lookup, "REQUEST_TIMEOUT_SECS", "u64")? {
            self.request_timeout_secs = v;
        }
        if let Some(v) = parse_env(&lookup, "BACKOFF_UNIT_MS", "u64")? {
            self.backoff_unit_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        if let Some(v) = parse_env(&lookup, "DRY_RUN", "bool")? {
            self.dry_run = v;
        }
        Ok(())
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::invalid("api_key", "API Key 不能为空"));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::invalid("api_base_url", "API 地址不能为空"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "必须大于 0"));
        }
        if self.page_max_attempts == 0 || self.submit_max_attempts == 0 {
            return Err(ConfigError::invalid("max_attempts", "尝试次数必须大于 0"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff_unit(&self) -> Duration {
        Duration::from_millis(self.backoff_unit_ms)
    }
}

fn parse_env<T, F>(lookup: &F, var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
