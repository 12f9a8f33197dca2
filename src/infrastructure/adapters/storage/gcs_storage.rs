//! GCS Object Storage - Cloud Storage JSON API 上传
//!
//! 实现 ObjectStoragePort
//!
//! POST {api_base}/upload/storage/v1/b/{bucket}/o?uploadType=media&name={key}
//! Header: Authorization: Bearer {access_token}
//! 公开 URL: {api_base}/{bucket}/{key}（bucket 需允许公开读取）

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{ObjectStoragePort, StorageError};

/// GCS 存储配置
#[derive(Debug, Clone)]
pub struct GcsStorageConfig {
    pub bucket: String,
    pub access_token: String,
    pub api_base: String,
    /// 上传超时时间（秒）
    pub timeout_secs: u64,
}

impl GcsStorageConfig {
    pub fn new(bucket: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            access_token: access_token.into(),
            api_base: "https://storage.googleapis.com".to_string(),
            timeout_secs: 60,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// 上传响应中用到的字段
#[derive(Debug, Deserialize)]
struct ObjectResource {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    size: Option<String>,
}

/// GCS 对象存储
pub struct GcsObjectStorage {
    client: Client,
    config: GcsStorageConfig,
}

impl GcsObjectStorage {
    pub fn new(config: GcsStorageConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn base(&self) -> &str {
        self.config.api_base.trim_end_matches('/')
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/storage/v1/b/{}/o", self.base(), self.config.bucket)
    }

    /// 对象的公开访问 URL
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base(), self.config.bucket, key)
    }
}

#[async_trait]
impl ObjectStoragePort for GcsObjectStorage {
    async fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError> {
        tracing::debug!(
            bucket = %self.config.bucket,
            key = %key,
            size = bytes.len(),
            "Uploading object"
        );

        let response = self
            .client
            .post(self.upload_url())
            .query(&[("uploadType", "media"), ("name", key)])
            .bearer_auth(&self.config.access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StorageError::Timeout
                } else {
                    StorageError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(StorageError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // 响应体只用于日志，解析失败不影响上传结果
        match response.json::<ObjectResource>().await {
            Ok(object) => tracing::debug!(
                name = ?object.name,
                size = ?object.size,
                "Object stored"
            ),
            Err(e) => tracing::debug!(error = %e, "Upload response not parsed"),
        }

        Ok(self.public_url(key))
    }
}
