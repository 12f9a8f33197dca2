//! Image Model Port - 图片生成能力抽象

use async_trait::async_trait;
use thiserror::Error;

/// 图片模型错误
#[derive(Debug, Error)]
pub enum ImageModelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 图片宽高比
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    Square,
    #[default]
    Landscape,
    Portrait,
    Standard,
    StandardPortrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Standard => "4:3",
            AspectRatio::StandardPortrait => "3:4",
        }
    }
}

/// 图片生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageModelRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub aspect_ratio: AspectRatio,
    /// 请求图片数量（1-4）
    pub number_of_images: u8,
}

/// 模型返回的原始图片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

impl RawImage {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime_type: Some("image/png".to_string()),
        }
    }

    /// 图片格式（png / jpeg），未知时按 png 处理
    pub fn format(&self) -> &'static str {
        match self.mime_type.as_deref() {
            Some("image/jpeg") | Some("image/jpg") => "jpeg",
            _ => "png",
        }
    }
}

/// Image Model Port
///
/// 返回零张或多张图片；零张不是错误，由调用方决定如何处理
#[async_trait]
pub trait ImageModelPort: Send + Sync {
    async fn generate(&self, request: ImageModelRequest) -> Result<Vec<RawImage>, ImageModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_ratio_default_is_landscape() {
        assert_eq!(AspectRatio::default().as_str(), "16:9");
    }

    #[test]
    fn test_raw_image_format() {
        assert_eq!(RawImage::png(vec![1]).format(), "png");
        let jpeg = RawImage {
            bytes: vec![1],
            mime_type: Some("image/jpeg".to_string()),
        };
        assert_eq!(jpeg.format(), "jpeg");
        let unknown = RawImage {
            bytes: vec![1],
            mime_type: None,
        };
        assert_eq!(unknown.format(), "png");
    }
}
