//! Story Events - 出站事件
//!
//! 每个连接的有序事件流，序列化为带 `type` 判别字段的 JSON

use serde::Serialize;

use crate::domain::illustration::ImageResult;

/// 出站事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoryEvent {
    /// 连接就绪
    Connected { message: String },
    /// 开始处理
    Processing { message: String },
    /// 故事文本分片（大文本时）
    StoryChunk { data: String, partial: bool },
    /// 故事文本完成
    StoryComplete { data: String },
    /// 单个场景的图片结果
    ImageGenerated { data: ImagePayload },
    /// 终止标记，每次运行最后发送且仅一次
    TurnComplete { turn_complete: bool },
    /// 致命错误
    Error { message: String },
    /// 心跳响应
    Pong,
}

impl StoryEvent {
    pub fn connected() -> Self {
        Self::Connected {
            message: "Connected to StoryGen backend".to_string(),
        }
    }

    pub fn processing() -> Self {
        Self::Processing {
            message: "Generating story and images...".to_string(),
        }
    }

    pub fn turn_complete() -> Self {
        Self::TurnComplete {
            turn_complete: true,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn image_generated(result: ImageResult) -> Self {
        Self::ImageGenerated {
            data: ImagePayload::from(result),
        }
    }

    /// 事件类型名，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected { .. } => "connected",
            Self::Processing { .. } => "processing",
            Self::StoryChunk { .. } => "story_chunk",
            Self::StoryComplete { .. } => "story_complete",
            Self::ImageGenerated { .. } => "image_generated",
            Self::TurnComplete { .. } => "turn_complete",
            Self::Error { .. } => "error",
            Self::Pong => "pong",
        }
    }
}

/// image_generated 事件的数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePayload {
    pub index: usize,
    pub scene_title: String,
    pub format: String,
    pub stored_in_bucket: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<bool>,
}

impl From<ImageResult> for ImagePayload {
    fn from(result: ImageResult) -> Self {
        let stored_in_bucket = result.stored_in_bucket();
        Self {
            index: result.scene_index,
            scene_title: result.scene_title,
            format: result.format,
            stored_in_bucket,
            gcs_url: result.reference,
            base64: result.payload,
            error: result.error,
            bucket_error: result.bucket_error,
            placeholder: result.is_placeholder.then_some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::illustration::Publication;
    use serde_json::json;

    #[test]
    fn test_turn_complete_wire_format() {
        let value = serde_json::to_value(StoryEvent::turn_complete()).unwrap();
        assert_eq!(value, json!({"type": "turn_complete", "turn_complete": true}));
    }

    #[test]
    fn test_pong_wire_format() {
        let value = serde_json::to_value(StoryEvent::Pong).unwrap();
        assert_eq!(value, json!({"type": "pong"}));
    }

    #[test]
    fn test_story_chunk_wire_format() {
        let event = StoryEvent::StoryChunk {
            data: "abc".to_string(),
            partial: true,
        };
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value, json!({"type": "story_chunk", "data": "abc", "partial": true}));
    }

    #[test]
    fn test_durable_image_payload() {
        let result = ImageResult::published(
            1,
            "The Inciting Incident",
            "png",
            Publication::durable("https://storage.googleapis.com/bucket/a.png", None),
        );
        let value = serde_json::to_value(StoryEvent::image_generated(result)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "image_generated",
                "data": {
                    "index": 1,
                    "scene_title": "The Inciting Incident",
                    "format": "png",
                    "stored_in_bucket": true,
                    "gcs_url": "https://storage.googleapis.com/bucket/a.png"
                }
            })
        );
    }

    #[test]
    fn test_placeholder_payload() {
        let result = ImageResult::placeholder(2, "The Climax", "Image generation failed: empty");
        let payload = ImagePayload::from(result);
        assert_eq!(payload.placeholder, Some(true));
        assert!(!payload.stored_in_bucket);
        assert!(payload.gcs_url.is_none());
        assert!(payload.base64.is_none());

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["placeholder"], json!(true));
        assert_eq!(value["error"], json!("Image generation failed: empty"));
    }

    #[test]
    fn test_inline_payload_omits_gcs_url() {
        let result = ImageResult::published(0, "Setup", "png", Publication::inline("QUJD".into()));
        let value = serde_json::to_value(ImagePayload::from(result)).unwrap();
        assert_eq!(value["stored_in_bucket"], json!(false));
        assert_eq!(value["base64"], json!("QUJD"));
        assert!(value.get("gcs_url").is_none());
        assert!(value.get("placeholder").is_none());
    }
}
