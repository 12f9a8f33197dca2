//! Story Pipeline - 两阶段生成流水线
//!
//! 故事文本 → 逐场景插图，结果按序增量下发

mod image_generation;
mod publisher;
mod scene;
mod story;
mod structured_generation;

#[cfg(test)]
pub(crate) mod test_support;

pub use image_generation::{ImageGenerationClient, NEGATIVE_PROMPT, STYLE_PREFIX};
pub use publisher::{content_type, object_key, ArtifactPublisher, PublishContext};
pub use scene::ScenePipeline;
pub use story::{StoryPipeline, StoryPipelineConfig};
pub use structured_generation::StructuredGenerationClient;
