//! Application State
//!
//! 所有连接共享的只读状态

use std::sync::Arc;

use crate::application::StoryPipeline;

/// 应用状态
pub struct AppState {
    pub story_pipeline: Arc<StoryPipeline>,
}

impl AppState {
    pub fn new(story_pipeline: Arc<StoryPipeline>) -> Self {
        Self { story_pipeline }
    }
}
