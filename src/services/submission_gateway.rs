//! 提交网关 - 业务能力层
//!
//! 只负责"把提交包交给远端"能力：一次请求、一次响应，
//! 不重试、不退避，任何非成功结果都视为失败

use std::future::Future;

use chrono::Utc;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::{Config, SubmissionMode};
use crate::error::{AppError, AppResult, SubmitError};
use crate::infrastructure::KvStore;
use crate::models::{StoredSubmission, SubmissionBundle, SubmitResponse};

/// 本地提交记录的存储键
pub const SUBMISSIONS_KEY: &str = "survey_submissions";

/// 提交网关
pub trait SubmissionGateway {
    /// 提交问卷，成功返回 `Ok(())`
    fn submit(&self, bundle: &SubmissionBundle) -> impl Future<Output = AppResult<()>> + Send;
}

/// HTTP 提交网关
///
/// `POST` JSON 到配置的接口，期望返回 `{ success: bool, error?: string }`
pub struct HttpGateway {
    client: Client,
    endpoint: String,
}

impl HttpGateway {
    pub fn new(config: &Config) -> Self {
        Self::with_endpoint(config.submit_endpoint.clone())
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 解释接口响应
    fn interpret(&self, status: u16, body: &str) -> AppResult<()> {
        let parsed = serde_json::from_str::<SubmitResponse>(body);

        if !(200..300).contains(&status) {
            return Err(SubmitError::BadStatus {
                endpoint: self.endpoint.clone(),
                status,
                message: parsed.ok().and_then(|r| r.error),
            }
            .into());
        }

        let response = parsed.map_err(|e| SubmitError::MalformedResponse {
            endpoint: self.endpoint.clone(),
            source: Box::new(e),
        })?;

        if response.success {
            Ok(())
        } else {
            Err(SubmitError::Rejected {
                message: response.error,
            }
            .into())
        }
    }
}

impl SubmissionGateway for HttpGateway {
    async fn submit(&self, bundle: &SubmissionBundle) -> AppResult<()> {
        debug!("提交问卷到: {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(bundle)
            .send()
            .await
            .map_err(|e| AppError::submit_request_failed(&self.endpoint, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::submit_request_failed(&self.endpoint, e))?;

        debug!("提交接口返回: status={}, body={}", status, body);

        self.interpret(status, &body)
    }
}

/// 本地提交网关
///
/// 没有远端服务时把提交记录追加到本地存储的 `survey_submissions` 中
pub struct LocalGateway<S: KvStore> {
    store: S,
}

impl<S: KvStore> LocalGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// 读取已保存的全部提交记录
    pub fn submissions(&self) -> AppResult<Vec<StoredSubmission>> {
        load_submissions(&self.store)
    }

    fn append(&self, bundle: &SubmissionBundle) -> AppResult<()> {
        let mut existing = self.submissions()?;
        existing.push(StoredSubmission::from_bundle(bundle, Utc::now()));
        let raw = serde_json::to_string(&existing)?;
        self.store.set(SUBMISSIONS_KEY, &raw)?;
        info!("✓ 已保存到本地提交记录 (共 {} 条)", existing.len());
        Ok(())
    }
}

impl<S: KvStore + Sync> SubmissionGateway for LocalGateway<S> {
    async fn submit(&self, bundle: &SubmissionBundle) -> AppResult<()> {
        self.append(bundle).map_err(|e| {
            warn!("⚠️ 本地保存提交记录失败: {}", e);
            e
        })
    }
}

/// 按配置选择的提交网关
pub enum Gateway<S: KvStore> {
    Http(HttpGateway),
    Local(LocalGateway<S>),
}

impl<S: KvStore> Gateway<S> {
    pub fn from_config(config: &Config, store: S) -> Self {
        match config.submission_mode {
            SubmissionMode::Http => Gateway::Http(HttpGateway::new(config)),
            SubmissionMode::Local => Gateway::Local(LocalGateway::new(store)),
        }
    }
}

impl<S: KvStore + Sync> SubmissionGateway for Gateway<S> {
    async fn submit(&self, bundle: &SubmissionBundle) -> AppResult<()> {
        match self {
            Gateway::Http(g) => g.submit(bundle).await,
            Gateway::Local(g) => g.submit(bundle).await,
        }
    }
}

/// 从存储中读取提交记录列表
pub fn load_submissions<S: KvStore + ?Sized>(store: &S) -> AppResult<Vec<StoredSubmission>> {
    match store.get(SUBMISSIONS_KEY)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|e| AppError::storage_corrupted(SUBMISSIONS_KEY, e)),
        None => Ok(Vec::new()),
    }
}
