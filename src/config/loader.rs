//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. PORT 环境变量（仅 server.port）
//! 2. 环境变量（`STORYGEN_` 前缀）
//! 3. 配置文件（config.toml）
//! 4. GOOGLE_API_KEY / GENMEDIA_BUCKET
//! 5. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StoryProvider};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "STORYGEN";

/// 不带前缀的部署环境变量
#[derive(Debug, Clone, Default)]
struct EnvFallbacks {
    /// PORT（Cloud Run 约定）
    port: Option<String>,
    /// GOOGLE_API_KEY
    google_api_key: Option<String>,
    /// GENMEDIA_BUCKET
    genmedia_bucket: Option<String>,
}

impl EnvFallbacks {
    fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            port: read("PORT"),
            google_api_key: read("GOOGLE_API_KEY"),
            genmedia_bucket: read("GENMEDIA_BUCKET"),
        }
    }
}

/// 加载应用配置
///
/// # 环境变量示例
/// - `STORYGEN_SERVER__PORT=8080`
/// - `STORYGEN_STORY__PROVIDER=fake`
/// - `STORYGEN_IMAGE__PROVIDER=disabled`
/// - `STORYGEN_STORAGE__ACCESS_TOKEN=ya29...`
/// - `STORYGEN_PIPELINE__SCENE_DELAY_MS=0`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_with_fallbacks(config_path, EnvFallbacks::from_env())
}

fn load_with_fallbacks(
    config_path: Option<&Path>,
    fallbacks: EnvFallbacks,
) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("pipeline.scene_delay_ms", 2000)?
        .set_default("pipeline.story_chunk_chars", 2000)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 部署环境变量作为默认值
    if let Some(key) = fallbacks.google_api_key {
        builder = builder
            .set_default("story.api_key", key.clone())?
            .set_default("image.api_key", key)?;
    }
    if let Some(bucket) = fallbacks.genmedia_bucket {
        builder = builder.set_default("storage.bucket", bucket)?;
    }

    // 3. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 4. 环境变量
    // 前缀: STORYGEN_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 5. PORT 覆盖监听端口
    builder = builder.set_override_option("server.port", fallbacks.port)?;

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.pipeline.story_chunk_chars == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.story_chunk_chars must be greater than 0".to_string(),
        ));
    }

    if config.story.provider == StoryProvider::Gemini && config.story.api_base.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "story.api_base cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn secret_state(secret: &Option<String>) -> &'static str {
    if secret.as_deref().is_some_and(|s| !s.is_empty()) {
        "set"
    } else {
        "not set"
    }
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    if config.server.static_files.enabled {
        tracing::info!(
            "Static Files: {:?} at {}",
            config.server.static_files.dir,
            config.server.static_files.path
        );
    }
    tracing::info!(
        "Story Model: {:?} {} (api key {})",
        config.story.provider,
        config.story.model,
        secret_state(&config.story.api_key)
    );
    tracing::info!(
        "Image Model: {:?} {} (api key {})",
        config.image.provider,
        config.image.model,
        secret_state(&config.image.api_key)
    );
    tracing::info!(
        "Storage Bucket: {} (access token {})",
        config.storage.bucket.as_deref().unwrap_or("none"),
        secret_state(&config.storage.access_token)
    );
    tracing::info!("Object Prefix: {}", config.storage.object_prefix);
    tracing::info!("Scene Delay: {}ms", config.pipeline.scene_delay_ms);
    tracing::info!("Story Chunk Chars: {}", config.pipeline.story_chunk_chars);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
