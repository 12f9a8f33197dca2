//! Image Generation Client
//!
//! 在图片模型外包一层：固定画风前缀、负面提示词、16:9、每次一张

use std::sync::Arc;

use crate::application::error::SceneImageError;
use crate::application::ports::{
    AspectRatio, Capability, ImageModelPort, ImageModelRequest, RawImage,
};

/// 画风前缀
pub const STYLE_PREFIX: &str = "Children's book illustration in cartoon style with bright vibrant colors, simple shapes, and friendly characters.";

/// 负面提示词
pub const NEGATIVE_PROMPT: &str = "photorealistic, realistic, blurry, low quality, watermark, text overlay";

/// 每个场景请求的图片数
const IMAGES_PER_SCENE: u8 = 1;

/// 图片生成客户端
pub struct ImageGenerationClient {
    model: Capability<dyn ImageModelPort>,
}

impl ImageGenerationClient {
    pub fn new(model: Capability<dyn ImageModelPort>) -> Self {
        Self { model }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_available()
    }

    /// 生成图片，至少返回一张，否则返回 NoImages
    pub async fn generate(&self, prompt: &str) -> Result<Vec<RawImage>, SceneImageError> {
        let model: &Arc<dyn ImageModelPort> = self
            .model
            .get()
            .map_err(|reason| SceneImageError::Unavailable(reason.to_string()))?;

        if prompt.trim().is_empty() {
            return Err(SceneImageError::EmptyPrompt);
        }

        let request = ImageModelRequest {
            prompt: format!("{} {}", STYLE_PREFIX, prompt.trim()),
            negative_prompt: Some(NEGATIVE_PROMPT.to_string()),
            aspect_ratio: AspectRatio::Landscape,
            number_of_images: IMAGES_PER_SCENE,
        };

        tracing::debug!(prompt_len = request.prompt.len(), "Sending image generation request");

        let images = model.generate(request).await?;
        if images.is_empty() {
            return Err(SceneImageError::NoImages);
        }

        tracing::debug!(images = images.len(), "Image model returned images");
        Ok(images)
    }
}
