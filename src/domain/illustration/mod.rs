//! Illustration Context - 插图限界上下文
//!
//! 职责:
//! - 场景图片提示词
//! - 图片结果与存储方式

mod image_result;
mod prompt;

pub use image_result::{ImageResult, Publication, StorageMode};
pub use prompt::{compose_scene_prompt, CONSISTENCY_NOTE, LOCKED_STYLE};
