//! Fake Story Client - 用于本地开发与测试的文本模型
//!
//! 不调用外部服务，根据关键词生成固定结构的四场景故事，
//! 以代码块包裹并切成多个片段返回（与真实模型的输出形态一致）

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use serde_json::json;
use std::time::Duration;

use crate::application::ports::{
    FragmentStream, Role, StoryModelError, StoryModelPort, StoryModelRequest,
};

/// Fake Story Client 配置
#[derive(Debug, Clone)]
pub struct FakeStoryClientConfig {
    /// 每个片段的字符数
    pub fragment_chars: usize,
    /// 片段之间的延迟
    pub fragment_delay: Duration,
}

impl Default for FakeStoryClientConfig {
    fn default() -> Self {
        Self {
            fragment_chars: 48,
            fragment_delay: Duration::from_millis(20),
        }
    }
}

/// Fake Story Client
pub struct FakeStoryClient {
    config: FakeStoryClientConfig,
}

impl FakeStoryClient {
    pub fn new(config: FakeStoryClientConfig) -> Self {
        tracing::info!(
            fragment_chars = config.fragment_chars,
            "FakeStoryClient initialized"
        );
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeStoryClientConfig::default())
    }

    /// 从用户消息中取出关键词
    fn keywords(request: &StoryModelRequest) -> String {
        request
            .messages
            .iter()
            .rev()
            .find(|message| message.role == Role::User)
            .map(|message| {
                let text = message.text.trim();
                text.strip_prefix("Keywords:").unwrap_or(text).trim().to_string()
            })
            .filter(|keywords| !keywords.is_empty())
            .unwrap_or_else(|| "a sunny day".to_string())
    }

    fn compose(keywords: &str) -> String {
        let document = json!({
            "story": format!("A small adventure about {}.", keywords),
            "main_characters": [
                {
                    "name": "Pip",
                    "description": "A small round grey mouse with big pink ears, black bead eyes and a red scarf"
                }
            ],
            "scenes": [
                {
                    "index": 1,
                    "title": "The Setup",
                    "description": "A cozy burrow under an oak tree at sunrise",
                    "text": format!("Pip woke up dreaming of {}.", keywords)
                },
                {
                    "index": 2,
                    "title": "The Inciting Incident",
                    "description": "A winding forest path with a mysterious map on the ground",
                    "text": "A gust of wind carried a map right to the door."
                },
                {
                    "index": 3,
                    "title": "The Climax",
                    "description": "Crossing a wobbly log bridge over a sparkling stream",
                    "text": "Pip took a deep breath and hopped across the bridge."
                },
                {
                    "index": 4,
                    "title": "The Resolution",
                    "description": "A picnic on a hilltop under a golden sky",
                    "text": "Friends gathered for a picnic, and everyone laughed."
                }
            ]
        });

        format!("```json\n{:#}\n```", document)
    }
}

#[async_trait]
impl StoryModelPort for FakeStoryClient {
    async fn generate(&self, request: StoryModelRequest) -> Result<FragmentStream, StoryModelError> {
        let keywords = Self::keywords(&request);
        let output = Self::compose(&keywords);

        let size = self.config.fragment_chars.max(1);
        let chars: Vec<char> = output.chars().collect();
        let fragments: Vec<String> = chars.chunks(size).map(|c| c.iter().collect()).collect();

        tracing::debug!(
            keywords = %keywords,
            fragments = fragments.len(),
            "FakeStoryClient: returning canned story"
        );

        let delay = self.config.fragment_delay;
        let stream = stream::iter(fragments).then(move |fragment| async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(fragment)
        });

        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::{parse_story_document, sanitize, story_user_prompt};

    #[tokio::test]
    async fn test_output_parses_as_four_scenes() {
        let client = FakeStoryClient::new(FakeStoryClientConfig {
            fragment_chars: 7,
            fragment_delay: Duration::ZERO,
        });
        let request = StoryModelRequest::new("system", story_user_prompt("a rainy city")).expect_json();

        let fragments: Vec<String> = client
            .generate(request)
            .await
            .unwrap()
            .map(|fragment| fragment.unwrap())
            .collect()
            .await;
        assert!(fragments.len() > 1);

        let raw = fragments.concat();
        assert!(raw.starts_with("```json"));

        let doc = parse_story_document(sanitize(&raw)).unwrap();
        assert_eq!(doc.scene_count(), 4);
        assert!(doc.scenes().unwrap()[0].text.contains("a rainy city"));
    }

    #[test]
    fn test_keywords_fallback() {
        let request = StoryModelRequest::new("system", "Keywords:   ");
        assert_eq!(FakeStoryClient::keywords(&request), "a sunny day");
    }
}
