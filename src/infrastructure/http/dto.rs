//! Data Transfer Objects
//!
//! WebSocket 入站消息与 HTTP 响应体

use serde::{Deserialize, Serialize};

/// 客户端消息（带 `type` 判别字段）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// 开始一次故事生成，`data` 为关键词
    GenerateStory {
        #[serde(default)]
        data: String,
    },
    /// 心跳
    Ping,
}

impl ClientMessage {
    /// 解析文本帧；未知 type 或格式错误返回 Err
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

/// 服务信息响应
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub workflow: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_story() {
        let msg = ClientMessage::parse(r#"{"type": "generate_story", "data": "a rainy city"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::GenerateStory {
                data: "a rainy city".to_string()
            }
        );
    }

    #[test]
    fn test_parse_generate_story_without_data() {
        let msg = ClientMessage::parse(r#"{"type": "generate_story"}"#).unwrap();
        assert_eq!(msg, ClientMessage::GenerateStory { data: String::new() });
    }

    #[test]
    fn test_parse_ping() {
        assert_eq!(ClientMessage::parse(r#"{"type": "ping"}"#).unwrap(), ClientMessage::Ping);
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(ClientMessage::parse(r#"{"type": "dance"}"#).is_err());
        assert!(ClientMessage::parse(r#"{"data": "no type"}"#).is_err());
        assert!(ClientMessage::parse("not json").is_err());
    }
}
