//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（StoryModel、ImageModel、ObjectStorage、DeliveryChannel）
//! - pipeline: 故事生成与场景插图流水线
//! - events: 出站事件
//! - error: 应用层错误定义

pub mod error;
pub mod events;
pub mod pipeline;
pub mod ports;

// Re-exports
pub use error::{SceneImageError, StoryGenerationError};
pub use events::{ImagePayload, StoryEvent};
pub use pipeline::{
    ArtifactPublisher, ImageGenerationClient, ScenePipeline, StoryPipeline, StoryPipelineConfig,
    StructuredGenerationClient,
};
pub use ports::{
    Capability, ChannelClosed, DeliveryChannel, ImageModelPort, ObjectStoragePort, StoryModelPort,
};
