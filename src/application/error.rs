//! 应用层错误定义
//!
//! - StoryGenerationError: 故事文本无法生成或解析，整个请求终止
//! - SceneImageError: 单个场景图片失败，只影响该场景（转为占位结果）
//!
//! 对象存储降级不是错误，只体现在 Publication::bucket_error；
//! 通道关闭见 ports::ChannelClosed

use thiserror::Error;

use crate::application::ports::{ImageModelError, StoryModelError};
use crate::domain::story::StoryParseError;

/// 故事生成错误（致命）
#[derive(Debug, Error)]
pub enum StoryGenerationError {
    /// 文本模型未配置
    #[error("story model unavailable: {0}")]
    Unavailable(String),

    /// 模型调用失败（含超时）
    #[error("story model error: {0}")]
    Model(#[from] StoryModelError),

    /// 输出无法解析
    #[error("{0}")]
    Malformed(#[from] StoryParseError),
}

/// 场景图片错误（隔离）
#[derive(Debug, Error)]
pub enum SceneImageError {
    /// 图片模型未配置
    #[error("image model unavailable: {0}")]
    Unavailable(String),

    #[error("Prompt is required for image generation")]
    EmptyPrompt,

    /// 模型调用失败（含超时）
    #[error("{0}")]
    Model(#[from] ImageModelError),

    /// 模型没有返回图片
    #[error("image model returned no images")]
    NoImages,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_story_error_messages() {
        let err = StoryGenerationError::from(StoryParseError::malformed("bad"));
        assert!(err.to_string().contains("bad"));

        let err = StoryGenerationError::from(StoryModelError::Timeout);
        assert_eq!(err.to_string(), "story model error: Request timeout");
    }

    #[test]
    fn test_scene_error_messages() {
        let err = SceneImageError::from(ImageModelError::ServiceError("HTTP 429".into()));
        assert_eq!(err.to_string(), "Service error: HTTP 429");
        assert_eq!(
            SceneImageError::NoImages.to_string(),
            "image model returned no images"
        );
    }
}
