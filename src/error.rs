use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 本地存储相关错误
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),
    /// 问卷提交错误
    #[error("提交错误: {0}")]
    Submit(#[from] SubmitError),
    /// 问卷流程错误
    #[error("流程错误: {0}")]
    Flow(#[from] FlowError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 本地存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    /// 读取存储文件失败
    #[error("读取存储失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入存储文件失败
    #[error("写入存储失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 存储内容无法解析
    #[error("存储内容解析失败 (键: {key}): {source}")]
    Corrupted {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// 存储不可用（锁中毒、磁盘不可写等）
    #[error("存储不可用: {reason}")]
    Unavailable { reason: String },
}

/// 问卷提交错误
#[derive(Debug, Error)]
pub enum SubmitError {
    /// 网络请求失败
    #[error("提交请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 服务端返回非 2xx 状态码
    #[error("提交接口返回错误状态 ({endpoint}): status={status}, message={message:?}")]
    BadStatus {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 服务端明确拒绝
    #[error("提交被拒绝: {message:?}")]
    Rejected { message: Option<String> },
    /// 响应体无法解析
    #[error("提交响应解析失败 ({endpoint}): {source}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 问卷流程错误
#[derive(Debug, Error)]
pub enum FlowError {
    /// 没有参与者信息
    #[error("未找到参与者信息，请先填写登记表")]
    MissingParticipant,
    /// 题目列表为空
    #[error("题目列表为空")]
    EmptyCatalog,
    /// 选项不属于当前题目
    #[error("选项 '{option}' 不属于题目 {question_id}")]
    UnknownOption { question_id: String, option: String },
    /// 答案类型与题目类型不符
    #[error("题目 {question_id} 需要 {expected} 类型的答案")]
    AnswerKindMismatch {
        question_id: String,
        expected: &'static str,
    },
    /// 当前状态不允许该操作
    #[error("当前状态 {state} 不允许执行 {action}")]
    InvalidState { state: String, action: &'static str },
    /// 登记表字段为空
    #[error("登记表字段 {field} 不能为空")]
    BlankField { field: &'static str },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    FileParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(StorageError::Corrupted {
            key: String::new(),
            source: err,
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(StorageError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::FileParseFailed {
            path: String::new(), // TOML错误通常不包含路径信息
            source: err,
        })
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let endpoint = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_default();
        AppError::Submit(SubmitError::RequestFailed {
            endpoint,
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建存储读取错误
    pub fn storage_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Storage(StorageError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建存储写入错误
    pub fn storage_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Storage(StorageError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建存储内容损坏错误
    pub fn storage_corrupted(key: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::Storage(StorageError::Corrupted {
            key: key.into(),
            source,
        })
    }

    /// 创建提交请求失败错误
    pub fn submit_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Submit(SubmitError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 是否为提交阶段的错误
    pub fn is_submit(&self) -> bool {
        matches!(self, AppError::Submit(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_error_display() {
        let err = AppError::from(FlowError::UnknownOption {
            question_id: "beg-2".to_string(),
            option: "Rust".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "流程错误: 选项 'Rust' 不属于题目 beg-2"
        );
    }

    #[test]
    fn test_json_error_maps_to_storage() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Storage(StorageError::Corrupted { .. })));
        assert!(!err.is_submit());
    }
}
