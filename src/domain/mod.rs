//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Story Context: 故事文档、解析与展示文本
//! - Illustration Context: 场景插图提示词与图片结果

pub mod illustration;
pub mod story;
