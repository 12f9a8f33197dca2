//! Story Pipeline - 编排器
//!
//! 生成故事 → 解析 → 下发文本 → 按序逐个场景插图（场景间固定间隔）→ turn_complete。
//!
//! 错误隔离:
//! - 故事生成/解析失败：发送一个 error 事件后结束，不进入图片阶段
//! - 单个场景失败：转为占位结果，不影响后续场景
//! - 通道关闭：静默停止

use std::time::Duration;

use crate::application::events::StoryEvent;
use crate::application::ports::{ChannelClosed, DeliveryChannel};
use crate::domain::story::{chunk_text, render_story_text, StoryDocument};

use super::scene::ScenePipeline;
use super::structured_generation::StructuredGenerationClient;

/// 编排器配置
#[derive(Debug, Clone)]
pub struct StoryPipelineConfig {
    /// 相邻两个场景图片之间的间隔（最后一个之后不等待）
    pub scene_delay: Duration,
    /// 故事文本超过该字符数时分片下发
    pub story_chunk_chars: usize,
}

impl Default for StoryPipelineConfig {
    fn default() -> Self {
        Self {
            scene_delay: Duration::from_secs(2),
            story_chunk_chars: 2000,
        }
    }
}

/// Story Pipeline
///
/// 无请求级可变状态，可在多个连接间共享
pub struct StoryPipeline {
    story: StructuredGenerationClient,
    scenes: ScenePipeline,
    config: StoryPipelineConfig,
}

impl StoryPipeline {
    pub fn new(
        story: StructuredGenerationClient,
        scenes: ScenePipeline,
        config: StoryPipelineConfig,
    ) -> Self {
        Self {
            story,
            scenes,
            config,
        }
    }

    /// 运行一次完整流程，不向调用方返回错误
    pub async fn run(&self, topic: &str, channel: &dyn DeliveryChannel) {
        let started = std::time::Instant::now();
        tracing::info!(topic = %topic, "Story run started");

        match self.execute(topic, channel).await {
            Ok(()) => tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Story run finished"
            ),
            Err(ChannelClosed) => tracing::info!(
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Delivery channel closed, story run stopped"
            ),
        }
    }

    async fn execute(&self, topic: &str, channel: &dyn DeliveryChannel) -> Result<(), ChannelClosed> {
        let document = match self.story.generate_document(topic).await {
            Ok(document) => document,
            Err(e) => {
                tracing::error!(error = %e, "Story generation failed");
                return channel
                    .send(StoryEvent::error(format!("Story generation failed: {}", e)))
                    .await;
            }
        };

        self.deliver_story_text(&document, channel).await?;

        match document.scenes() {
            Some(scenes) if !scenes.is_empty() => {
                let references = document.character_references();
                // 图片模型不可用时每个场景立即得到占位结果，无需限速
                let pace = self.scenes.is_available() && !self.config.scene_delay.is_zero();

                for (position, scene) in scenes.iter().enumerate() {
                    let result = self.scenes.run(position, scene, &references).await;
                    tracing::debug!(
                        scene_index = result.scene_index,
                        placeholder = result.is_placeholder,
                        "Sending scene image event"
                    );
                    channel.send(StoryEvent::image_generated(result)).await?;

                    if pace && position + 1 < scenes.len() {
                        tokio::time::sleep(self.config.scene_delay).await;
                    }
                }
            }
            _ => {
                tracing::info!("Story has no scenes, skipping image stage");
            }
        }

        channel.send(StoryEvent::turn_complete()).await
    }

    /// 下发故事文本；超长时先分片再发送空的 story_complete
    async fn deliver_story_text(
        &self,
        document: &StoryDocument,
        channel: &dyn DeliveryChannel,
    ) -> Result<(), ChannelClosed> {
        let text = render_story_text(document);
        let char_count = text.chars().count();

        if char_count <= self.config.story_chunk_chars {
            return channel.send(StoryEvent::StoryComplete { data: text }).await;
        }

        let chunks = chunk_text(&text, self.config.story_chunk_chars);
        tracing::debug!(chars = char_count, chunks = chunks.len(), "Sending story text in chunks");

        let last = chunks.len().saturating_sub(1);
        for (i, chunk) in chunks.into_iter().enumerate() {
            channel
                .send(StoryEvent::StoryChunk {
                    data: chunk.to_string(),
                    partial: i < last,
                })
                .await?;
        }

        channel
            .send(StoryEvent::StoryComplete {
                data: String::new(),
            })
            .await
    }
}
