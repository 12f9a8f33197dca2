//! Scene Pipeline
//!
//! 单个场景：组装提示词 → 生成图片 → 发布 → ImageResult。
//! 任何失败都转为占位结果，不向上抛出

use crate::application::error::SceneImageError;
use crate::domain::illustration::{compose_scene_prompt, ImageResult};
use crate::domain::story::{CharacterReferenceMap, Scene};

use super::image_generation::ImageGenerationClient;
use super::publisher::{ArtifactPublisher, PublishContext};

/// 场景插图流水线
pub struct ScenePipeline {
    images: ImageGenerationClient,
    publisher: ArtifactPublisher,
}

impl ScenePipeline {
    pub fn new(images: ImageGenerationClient, publisher: ArtifactPublisher) -> Self {
        Self { images, publisher }
    }

    /// 图片模型是否可用
    pub fn is_available(&self) -> bool {
        self.images.is_available()
    }

    /// 为一个场景生成插图，每个场景恰好返回一个结果
    ///
    /// `position` 是场景在排序后列表中的位置（0-based），即客户端网格下标
    pub async fn run(
        &self,
        position: usize,
        scene: &Scene,
        references: &CharacterReferenceMap,
    ) -> ImageResult {
        match self.illustrate(position, scene, references).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(
                    scene_index = position,
                    scene_title = %scene.title,
                    error = %e,
                    "Scene image generation failed"
                );
                ImageResult::placeholder(
                    position,
                    scene.title.as_str(),
                    format!("Image generation failed: {}", e),
                )
            }
        }
    }

    async fn illustrate(
        &self,
        position: usize,
        scene: &Scene,
        references: &CharacterReferenceMap,
    ) -> Result<ImageResult, SceneImageError> {
        let prompt = compose_scene_prompt(&scene.action_description, references);

        tracing::info!(
            scene_index = position,
            scene_title = %scene.title,
            characters = references.len(),
            "Generating scene image"
        );

        let mut images = self.images.generate(&prompt).await?.into_iter();
        let image = images.next().ok_or(SceneImageError::NoImages)?;

        let extra = images.count();
        if extra > 0 {
            tracing::warn!(
                scene_index = position,
                dropped = extra,
                "Image model returned more images than requested, keeping the first"
            );
        }

        let format = image.format();
        let ctx = PublishContext {
            prompt: &prompt,
            image_index: 0,
            format,
        };
        let publication = self.publisher.publish(&image.bytes, &ctx).await;

        tracing::info!(
            scene_index = position,
            size = image.bytes.len(),
            storage_mode = publication.storage_mode.as_str(),
            degraded = publication.is_degraded(),
            "Scene image published"
        );

        Ok(ImageResult::published(
            position,
            scene.title.as_str(),
            format,
            publication,
        ))
    }
}
