//! Story Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoryParseError {
    #[error("故事输出格式错误: {0}")]
    MalformedStoryOutput(String),
}

impl StoryParseError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedStoryOutput(message.into())
    }
}

impl From<serde_json::Error> for StoryParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedStoryOutput(format!("invalid JSON: {}", err))
    }
}
