//! Story Context - 故事限界上下文
//!
//! 职责:
//! - Story Document 及角色参考表
//! - 模型输出清理与解析
//! - 展示文本重建

mod document;
mod errors;
mod instruction;
mod parser;
mod render;
mod sanitizer;

pub use document::{Character, CharacterReferenceMap, Scene, StoryDocument};
pub use errors::StoryParseError;
pub use instruction::{story_user_prompt, STORY_INSTRUCTION};
pub use parser::parse_story_document;
pub use render::{chunk_text, render_story_text, scene_marker};
pub use sanitizer::{sanitize, FENCE_CLOSE, JSON_FENCE_OPEN};
