//! Illustration Context - Image Result

use serde::{Deserialize, Serialize};

/// 图片存储方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// 已上传对象存储，通过公开 URL 访问
    Durable,
    /// 图片字节以 base64 内联在事件中
    Inline,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Durable => "durable",
            StorageMode::Inline => "inline",
        }
    }
}

/// 发布结果
///
/// ArtifactPublisher 的输出，永远不是错误：
/// 上传失败时降级为 Inline，并在 `bucket_error` 中附带原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub storage_mode: StorageMode,
    /// 公开 URL（Durable 时存在）
    pub reference: Option<String>,
    /// base64 编码的图片（Inline 时存在，Durable 时可选附带）
    pub payload: Option<String>,
    /// 对象存储失败原因（非致命）
    pub bucket_error: Option<String>,
}

impl Publication {
    pub fn durable(reference: impl Into<String>, payload: Option<String>) -> Self {
        Self {
            storage_mode: StorageMode::Durable,
            reference: Some(reference.into()),
            payload,
            bucket_error: None,
        }
    }

    pub fn inline(payload: String) -> Self {
        Self {
            storage_mode: StorageMode::Inline,
            reference: None,
            payload: Some(payload),
            bucket_error: None,
        }
    }

    pub fn with_bucket_error(mut self, error: impl Into<String>) -> Self {
        self.bucket_error = Some(error.into());
        self
    }

    pub fn is_degraded(&self) -> bool {
        self.bucket_error.is_some()
    }
}

/// 单个场景的图片结果（成功或占位）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResult {
    /// 0-based，等于场景 index - 1
    pub scene_index: usize,
    pub scene_title: String,
    pub format: String,
    pub storage_mode: StorageMode,
    pub reference: Option<String>,
    pub payload: Option<String>,
    pub error: Option<String>,
    pub bucket_error: Option<String>,
    pub is_placeholder: bool,
}

impl ImageResult {
    /// 默认图片格式
    pub const DEFAULT_FORMAT: &'static str = "png";

    pub fn published(
        scene_index: usize,
        scene_title: impl Into<String>,
        format: impl Into<String>,
        publication: Publication,
    ) -> Self {
        Self {
            scene_index,
            scene_title: scene_title.into(),
            format: format.into(),
            storage_mode: publication.storage_mode,
            reference: publication.reference,
            payload: publication.payload,
            error: None,
            bucket_error: publication.bucket_error,
            is_placeholder: false,
        }
    }

    /// 占位结果，保证客户端网格的位置不缺失
    pub fn placeholder(
        scene_index: usize,
        scene_title: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            scene_index,
            scene_title: scene_title.into(),
            format: Self::DEFAULT_FORMAT.to_string(),
            storage_mode: StorageMode::Inline,
            reference: None,
            payload: None,
            error: Some(error.into()),
            bucket_error: None,
            is_placeholder: true,
        }
    }

    pub fn stored_in_bucket(&self) -> bool {
        !self.is_placeholder && self.storage_mode == StorageMode::Durable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_durable() {
        let result = ImageResult::published(
            2,
            "The Climax",
            "png",
            Publication::durable("https://storage.googleapis.com/b/k.png", None),
        );
        assert!(result.stored_in_bucket());
        assert!(!result.is_placeholder);
        assert_eq!(result.scene_index, 2);
        assert!(result.payload.is_none());
    }

    #[test]
    fn test_published_inline_with_bucket_error() {
        let publication = Publication::inline("aGVsbG8=".to_string()).with_bucket_error("403");
        assert!(publication.is_degraded());

        let result = ImageResult::published(0, "Setup", "png", publication);
        assert!(!result.stored_in_bucket());
        assert_eq!(result.payload.as_deref(), Some("aGVsbG8="));
        assert_eq!(result.bucket_error.as_deref(), Some("403"));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_placeholder() {
        let result = ImageResult::placeholder(3, "End", "Image generation failed: boom");
        assert!(result.is_placeholder);
        assert!(!result.stored_in_bucket());
        assert_eq!(result.format, "png");
        assert_eq!(result.error.as_deref(), Some("Image generation failed: boom"));
    }
}
