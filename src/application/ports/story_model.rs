//! Story Model Port - 文本生成能力抽象
//!
//! 接收带角色标记的提示词与结构化输出约定，返回增量文本片段流，
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

/// 文本模型错误
#[derive(Debug, Error)]
pub enum StoryModelError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
        }
    }
}

/// 带角色标记的消息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessage {
    pub role: Role,
    pub text: String,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

/// 文本生成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryModelRequest {
    /// 系统提示词
    pub system_instruction: String,
    /// 对话消息
    pub messages: Vec<PromptMessage>,
    /// 结构化输出 MIME 类型（如 application/json）
    pub response_mime_type: Option<String>,
}

impl StoryModelRequest {
    pub fn new(system_instruction: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            messages: vec![PromptMessage::user(user_text)],
            response_mime_type: None,
        }
    }

    /// 要求模型输出 JSON
    pub fn expect_json(mut self) -> Self {
        self.response_mime_type = Some("application/json".to_string());
        self
    }
}

/// 增量文本片段流，按发出顺序拼接
pub type FragmentStream = BoxStream<'static, Result<String, StoryModelError>>;

/// Story Model Port
///
/// 实现必须可在多个并发请求间共享（无请求级可变状态）
#[async_trait]
pub trait StoryModelPort: Send + Sync {
    /// 发起一次生成，返回片段流
    async fn generate(&self, request: StoryModelRequest) -> Result<FragmentStream, StoryModelError>;
}
