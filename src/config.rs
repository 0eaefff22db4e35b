use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError, FileError};
use crate::models::Mode;

/// 单个文件提交失败后的策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// 第一个失败后停止，后面的文件不再提交
    #[default]
    Abort,
    /// 逐个提交全部文件，失败单独记录
    Continue,
}

impl std::str::FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "continue" => Ok(FailurePolicy::Continue),
            _ => Err(ConfigError::InvalidValue {
                key: "failure_policy".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 处理服务地址
    pub api_base_url: String,
    /// 下游查看页地址
    pub viewer_base_url: String,
    /// 随每个请求发送的输出目录提示
    pub output_path_hint: String,
    /// 请求超时（秒），0 表示不设超时
    pub request_timeout_secs: u64,
    /// 待处理文件所在目录
    pub input_folder: String,
    /// 处理模式
    pub mode: Mode,
    /// 加密 / 解密时对每个文件使用的密钥
    pub key: String,
    /// 单批最多文件数，0 表示不限
    pub max_batch_files: usize,
    /// 提交失败策略
    pub failure_policy: FailurePolicy,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            viewer_base_url: "http://localhost:3000".to_string(),
            output_path_hint: "./public/output".to_string(),
            request_timeout_secs: 0,
            input_folder: "input_files".to_string(),
            mode: Mode::Obfuscate,
            key: String::new(),
            max_batch_files: 0,
            failure_policy: FailurePolicy::Abort,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 读取 TOML 配置文件，缺省项取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::file_read_failed(path.display().to_string(), e))?;
        toml::from_str(&content).map_err(|e| {
            FileError::TomlParseFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            }
            .into()
        })
    }

    /// 配置文件（`OBSCURA_CONFIG`，默认 `obscura.toml`，不存在则跳过）+ 环境变量
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("OBSCURA_CONFIG").unwrap_or_else(|_| "obscura.toml".to_string());
        let path = Path::new(&path);
        let base = if path.exists() {
            Self::from_toml_file(path)?
        } else {
            Self::default()
        };
        base.with_env_overrides()
    }

    /// 用环境变量覆盖
    pub fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(self.api_base_url),
            viewer_base_url: std::env::var("VIEWER_BASE_URL").unwrap_or(self.viewer_base_url),
            output_path_hint: std::env::var("OUTPUT_PATH_HINT").unwrap_or(self.output_path_hint),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(self.input_folder),
            mode: parse_env("PROCESSING_MODE", "mode")?.unwrap_or(self.mode),
            key: std::env::var("PROCESSING_KEY").unwrap_or(self.key),
            max_batch_files: parse_env("MAX_BATCH_FILES", "usize")?.unwrap_or(self.max_batch_files),
            failure_policy: parse_env("FAILURE_POLICY", "failure policy")?
                .unwrap_or(self.failure_policy),
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        })
    }

    /// 请求超时，0 秒表示不设
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// 产物下载地址
    pub fn download_url(&self, filename: &str) -> String {
        format!(
            "{}/api/files/download/{}",
            self.api_base_url.trim_end_matches('/'),
            filename
        )
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
