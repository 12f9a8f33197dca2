//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod capability;
mod delivery;
mod image_model;
mod object_storage;
mod story_model;

pub use capability::Capability;
pub use delivery::{ChannelClosed, DeliveryChannel};
pub use image_model::{AspectRatio, ImageModelError, ImageModelPort, ImageModelRequest, RawImage};
pub use object_storage::{ObjectStoragePort, StorageError};
pub use story_model::{
    FragmentStream, PromptMessage, Role, StoryModelError, StoryModelPort, StoryModelRequest,
};
