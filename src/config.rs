use crate::error::{AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "survey.toml";

/// 提交方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionMode {
    /// 通过 HTTP 接口提交
    Http,
    /// 写入本地存储（离线演示）
    Local,
}

impl SubmissionMode {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Some(Self::Http),
            "local" => Some(Self::Local),
            _ => None,
        }
    }
}

/// 题目轨道选择策略
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackPolicy {
    /// 按参与者技能等级选择轨道
    Adaptive,
    /// 始终使用初级轨道
    BeginnerOnly,
}

impl TrackPolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adaptive" => Some(Self::Adaptive),
            "beginner_only" => Some(Self::BeginnerOnly),
            _ => None,
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 问卷提交接口地址
    pub submit_endpoint: String,
    /// 本地存储文件路径
    pub storage_file: String,
    /// 提交方式
    pub submission_mode: SubmissionMode,
    /// 题目轨道选择策略
    pub track_policy: TrackPolicy,
    /// 感谢页倒计时秒数
    pub countdown_secs: u32,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            submit_endpoint: "http://localhost:3000/api/submit-survey".to_string(),
            storage_file: "soapbox_storage.json".to_string(),
            submission_mode: SubmissionMode::Http,
            track_policy: TrackPolicy::Adaptive,
            countdown_secs: 10,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：先读配置文件（若存在），再用环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let base = if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };
        base.with_env()
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::AppError::storage_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            crate::error::AppError::Config(ConfigError::FileParseFailed { source, .. }) => {
                ConfigError::FileParseFailed {
                    path: path.display().to_string(),
                    source,
                }
                .into()
            }
            other => other,
        })
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 仅使用默认值和环境变量
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env()
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env(self) -> AppResult<Self> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        if let Some(v) = var("SURVEY_ENDPOINT") {
            self.submit_endpoint = v;
        }
        if let Some(v) = var("SURVEY_STORAGE_FILE") {
            self.storage_file = v;
        }
        if let Some(v) = var("SURVEY_SUBMISSION_MODE") {
            self.submission_mode =
                SubmissionMode::parse(&v).ok_or_else(|| parse_error("SURVEY_SUBMISSION_MODE", &v, "http|local"))?;
        }
        if let Some(v) = var("SURVEY_TRACK_POLICY") {
            self.track_policy = TrackPolicy::parse(&v)
                .ok_or_else(|| parse_error("SURVEY_TRACK_POLICY", &v, "adaptive|beginner_only"))?;
        }
        if let Some(v) = var("SURVEY_COUNTDOWN_SECS") {
            self.countdown_secs = v
                .parse()
                .map_err(|_| parse_error("SURVEY_COUNTDOWN_SECS", &v, "u32"))?;
        }
        if let Some(v) = var("VERBOSE_LOGGING") {
            self.verbose_logging = v
                .parse()
                .map_err(|_| parse_error("VERBOSE_LOGGING", &v, "bool"))?;
        }
        Ok(self)
    }
}

fn parse_error(var_name: &str, value: &str, expected_type: &str) -> crate::error::AppError {
    ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    }
    .into()
}
