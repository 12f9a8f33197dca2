//! Object Storage Port - 出站端口
//!
//! 持久化对象存储（上传字节，返回公开 URL）

use async_trait::async_trait;
use thiserror::Error;

/// 对象存储错误
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Upload timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),
}

/// Object Storage Port
#[async_trait]
pub trait ObjectStoragePort: Send + Sync {
    /// 上传对象，返回公开访问 URL
    async fn upload(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StorageError>;
}
