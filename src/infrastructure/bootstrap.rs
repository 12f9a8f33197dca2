//! Bootstrap - 根据配置装配各个能力
//!
//! 缺少密钥或客户端初始化失败时，对应能力标记为不可用并记录原因，
//! 服务照常启动

use std::sync::Arc;

use crate::application::{
    ArtifactPublisher, Capability, ImageGenerationClient, ImageModelPort, ObjectStoragePort,
    ScenePipeline, StoryModelPort, StoryPipeline, StoryPipelineConfig, StructuredGenerationClient,
};
use crate::config::{
    AppConfig, ImageModelConfig, ImageProvider, StorageConfig, StoryModelConfig, StoryProvider,
};
use crate::infrastructure::adapters::{
    FakeImageClient, FakeStoryClient, GcsObjectStorage, GcsStorageConfig, GeminiStoryClient,
    GeminiStoryClientConfig, ImagenClient, ImagenClientConfig,
};

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// 文本模型能力
pub fn story_capability(config: &StoryModelConfig) -> Capability<dyn StoryModelPort> {
    match config.provider {
        StoryProvider::Fake => {
            let client: Arc<dyn StoryModelPort> = Arc::new(FakeStoryClient::with_defaults());
            Capability::available(client)
        }
        StoryProvider::Gemini => {
            let Some(api_key) = non_empty(&config.api_key) else {
                return Capability::unavailable("GOOGLE_API_KEY is not set");
            };
            let client_config = GeminiStoryClientConfig::new(api_key)
                .with_api_base(&config.api_base)
                .with_model(&config.model)
                .with_timeout(config.timeout_secs);
            match GeminiStoryClient::new(client_config) {
                Ok(client) => {
                    let client: Arc<dyn StoryModelPort> = Arc::new(client);
                    Capability::available(client)
                }
                Err(e) => Capability::unavailable(format!("failed to build story client: {}", e)),
            }
        }
    }
}

/// 图片模型能力
pub fn image_capability(config: &ImageModelConfig) -> Capability<dyn ImageModelPort> {
    match config.provider {
        ImageProvider::Disabled => Capability::unavailable("image generation disabled"),
        ImageProvider::Fake => {
            let client: Arc<dyn ImageModelPort> = Arc::new(FakeImageClient::with_defaults());
            Capability::available(client)
        }
        ImageProvider::Imagen => {
            let Some(api_key) = non_empty(&config.api_key) else {
                return Capability::unavailable("GOOGLE_API_KEY is not set");
            };
            let client_config = ImagenClientConfig::new(api_key)
                .with_api_base(&config.api_base)
                .with_model(&config.model)
                .with_timeout(config.timeout_secs);
            match ImagenClient::new(client_config) {
                Ok(client) => {
                    let client: Arc<dyn ImageModelPort> = Arc::new(client);
                    Capability::available(client)
                }
                Err(e) => Capability::unavailable(format!("failed to build image client: {}", e)),
            }
        }
    }
}

/// 对象存储能力
pub fn storage_capability(config: &StorageConfig) -> Capability<dyn ObjectStoragePort> {
    let Some(bucket) = non_empty(&config.bucket) else {
        return Capability::unavailable("GENMEDIA_BUCKET is not set");
    };
    let Some(token) = non_empty(&config.access_token) else {
        return Capability::unavailable("storage access token is not set");
    };

    let storage_config = GcsStorageConfig::new(bucket, token)
        .with_api_base(&config.api_base)
        .with_timeout(config.timeout_secs);
    match GcsObjectStorage::new(storage_config) {
        Ok(storage) => {
            let storage: Arc<dyn ObjectStoragePort> = Arc::new(storage);
            Capability::available(storage)
        }
        Err(e) => Capability::unavailable(format!("failed to build storage client: {}", e)),
    }
}

fn report<T: ?Sized>(name: &str, capability: &Capability<T>) {
    match capability.get() {
        Ok(_) => tracing::info!(capability = name, "Capability available"),
        Err(reason) => tracing::warn!(capability = name, reason = %reason, "Capability unavailable"),
    }
}

/// 装配 Story Pipeline
pub fn build_story_pipeline(config: &AppConfig) -> StoryPipeline {
    let story = story_capability(&config.story);
    let image = image_capability(&config.image);
    let storage = storage_capability(&config.storage);

    report("story_model", &story);
    report("image_model", &image);
    report("object_storage", &storage);

    let publisher = ArtifactPublisher::new(
        storage,
        &config.storage.object_prefix,
        config.pipeline.inline_copy_with_durable,
    );
    let scenes = ScenePipeline::new(ImageGenerationClient::new(image), publisher);
    let pipeline_config = StoryPipelineConfig {
        scene_delay: config.pipeline.scene_delay(),
        story_chunk_chars: config.pipeline.story_chunk_chars,
    };

    StoryPipeline::new(
        StructuredGenerationClient::new(story),
        scenes,
        pipeline_config,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_without_key_is_unavailable() {
        let config = StoryModelConfig::default();
        let capability = story_capability(&config);
        assert_eq!(capability.get().err(), Some("GOOGLE_API_KEY is not set"));
    }

    #[test]
    fn test_gemini_with_key_is_available() {
        let config = StoryModelConfig {
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert!(story_capability(&config).is_available());
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let config = ImageModelConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(!image_capability(&config).is_available());
    }

    #[test]
    fn test_fake_providers_need_no_key() {
        let story = StoryModelConfig {
            provider: StoryProvider::Fake,
            ..Default::default()
        };
        let image = ImageModelConfig {
            provider: ImageProvider::Fake,
            ..Default::default()
        };
        assert!(story_capability(&story).is_available());
        assert!(image_capability(&image).is_available());
    }

    #[test]
    fn test_disabled_image_provider() {
        let config = ImageModelConfig {
            provider: ImageProvider::Disabled,
            api_key: Some("key".to_string()),
            ..Default::default()
        };
        assert_eq!(
            image_capability(&config).get().err(),
            Some("image generation disabled")
        );
    }

    #[test]
    fn test_storage_requires_bucket_and_token() {
        let mut config = StorageConfig::default();
        assert!(!storage_capability(&config).is_available());

        config.bucket = Some("genmedia".to_string());
        assert_eq!(
            storage_capability(&config).get().err(),
            Some("storage access token is not set")
        );

        config.access_token = Some("token".to_string());
        assert!(storage_capability(&config).is_available());
    }

    #[tokio::test]
    async fn test_default_config_builds_pipeline() {
        let pipeline = build_story_pipeline(&AppConfig::default());
        let channel = crate::application::pipeline::test_support::RecordingChannel::open();

        pipeline.run("a robot", &channel).await;

        let events = channel.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), "error");
    }
}
