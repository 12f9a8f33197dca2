//! Structured Generation Client
//!
//! 调用文本模型，累积全部片段，清理并解析为 StoryDocument

use futures_util::StreamExt;
use std::sync::Arc;

use crate::application::error::StoryGenerationError;
use crate::application::ports::{Capability, StoryModelPort, StoryModelRequest};
use crate::domain::story::{
    parse_story_document, sanitize, story_user_prompt, StoryDocument, STORY_INSTRUCTION,
};

/// 结构化故事生成客户端
pub struct StructuredGenerationClient {
    model: Capability<dyn StoryModelPort>,
}

impl StructuredGenerationClient {
    pub fn new(model: Capability<dyn StoryModelPort>) -> Self {
        Self { model }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_available()
    }

    /// 生成原始文本（片段按发出顺序拼接）
    pub async fn generate(&self, topic: &str) -> Result<String, StoryGenerationError> {
        let model: &Arc<dyn StoryModelPort> = self
            .model
            .get()
            .map_err(|reason| StoryGenerationError::Unavailable(reason.to_string()))?;

        let request = StoryModelRequest::new(STORY_INSTRUCTION, story_user_prompt(topic)).expect_json();

        tracing::info!(topic = %topic, "Requesting story from story model");

        let mut fragments = model.generate(request).await?;
        let mut output = String::new();
        let mut fragment_count = 0usize;

        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            fragment_count += 1;
            output.push_str(&fragment);
            tracing::debug!(
                fragment_count,
                accumulated_len = output.len(),
                "Story fragment received"
            );
        }

        tracing::info!(
            fragment_count,
            response_len = output.len(),
            "Story model completed"
        );

        Ok(output)
    }

    /// 生成并解析故事文档
    pub async fn generate_document(&self, topic: &str) -> Result<StoryDocument, StoryGenerationError> {
        let raw = self.generate(topic).await?;
        let cleaned = sanitize(&raw);

        match parse_story_document(cleaned) {
            Ok(document) => {
                tracing::info!(
                    scenes = document.scene_count(),
                    characters = document.characters().len(),
                    "Story document parsed"
                );
                Ok(document)
            }
            Err(e) => {
                let head: String = cleaned.chars().take(200).collect();
                tracing::error!(error = %e, response_head = %head, "Failed to parse story output");
                Err(e.into())
            }
        }
    }
}
