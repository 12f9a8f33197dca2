//! Story Adapter - 文本模型客户端实现

mod fake_story_client;
mod gemini_story_client;

pub use fake_story_client::{FakeStoryClient, FakeStoryClientConfig};
pub use gemini_story_client::{GeminiStoryClient, GeminiStoryClientConfig};
