//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 文本模型配置
    #[serde(default)]
    pub story: StoryModelConfig,

    /// 图片模型配置
    #[serde(default)]
    pub image: ImageModelConfig,

    /// 对象存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 流水线配置
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录（前端构建产物）
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,

    /// URL 路径前缀（如 "/" 表示根路径托管）
    #[serde(default = "default_static_path")]
    pub path: String,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("frontend/out")
}

fn default_static_path() -> String {
    "/".to_string()
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
            path: default_static_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model_timeout() -> u64 {
    120
}

/// 文本模型提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryProvider {
    #[default]
    Gemini,
    /// 本地假模型（开发用）
    Fake,
}

/// 文本模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoryModelConfig {
    #[serde(default)]
    pub provider: StoryProvider,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_story_model")]
    pub model: String,

    /// 未设置时使用 GOOGLE_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_story_model() -> String {
    "gemini-2.5-flash".to_string()
}

impl Default for StoryModelConfig {
    fn default() -> Self {
        Self {
            provider: StoryProvider::default(),
            api_base: default_api_base(),
            model: default_story_model(),
            api_key: None,
            timeout_secs: default_model_timeout(),
        }
    }
}

/// 图片模型提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProvider {
    #[default]
    Imagen,
    /// 本地假模型（开发用）
    Fake,
    /// 不生成图片，每个场景都是占位结果
    Disabled,
}

/// 图片模型配置
#[derive(Debug, Clone, Deserialize)]
pub struct ImageModelConfig {
    #[serde(default)]
    pub provider: ImageProvider,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_image_model")]
    pub model: String,

    /// 未设置时使用 GOOGLE_API_KEY
    #[serde(default)]
    pub api_key: Option<String>,

    /// 请求超时时间（秒）
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

fn default_image_model() -> String {
    "imagen-3.0-generate-002".to_string()
}

impl Default for ImageModelConfig {
    fn default() -> Self {
        Self {
            provider: ImageProvider::default(),
            api_base: default_api_base(),
            model: default_image_model(),
            api_key: None,
            timeout_secs: default_model_timeout(),
        }
    }
}

/// 对象存储配置
///
/// bucket 与 access_token 都设置时才启用对象存储，否则图片以 base64 内联
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 未设置时使用 GENMEDIA_BUCKET
    #[serde(default)]
    pub bucket: Option<String>,

    #[serde(default = "default_storage_api_base")]
    pub api_base: String,

    /// OAuth2 访问令牌
    #[serde(default)]
    pub access_token: Option<String>,

    /// 对象名前缀
    #[serde(default = "default_object_prefix")]
    pub object_prefix: String,

    /// 上传超时时间（秒）
    #[serde(default = "default_storage_timeout")]
    pub timeout_secs: u64,
}

fn default_storage_api_base() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_object_prefix() -> String {
    "generated_images".to_string()
}

fn default_storage_timeout() -> u64 {
    60
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            api_base: default_storage_api_base(),
            access_token: None,
            object_prefix: default_object_prefix(),
            timeout_secs: default_storage_timeout(),
        }
    }
}

/// 流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// 场景之间的间隔（毫秒）
    #[serde(default = "default_scene_delay_ms")]
    pub scene_delay_ms: u64,

    /// 故事文本超过该字符数时分片下发
    #[serde(default = "default_story_chunk_chars")]
    pub story_chunk_chars: usize,

    /// 上传成功后是否仍附带 base64
    #[serde(default)]
    pub inline_copy_with_durable: bool,
}

fn default_scene_delay_ms() -> u64 {
    2000
}

fn default_story_chunk_chars() -> usize {
    2000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scene_delay_ms: default_scene_delay_ms(),
            story_chunk_chars: default_story_chunk_chars(),
            inline_copy_with_durable: false,
        }
    }
}

impl PipelineConfig {
    pub fn scene_delay(&self) -> Duration {
        Duration::from_millis(self.scene_delay_ms)
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.story.provider, StoryProvider::Gemini);
        assert_eq!(config.story.model, "gemini-2.5-flash");
        assert_eq!(config.image.provider, ImageProvider::Imagen);
        assert_eq!(config.image.model, "imagen-3.0-generate-002");
        assert_eq!(config.storage.object_prefix, "generated_images");
        assert!(config.storage.bucket.is_none());
        assert_eq!(config.pipeline.scene_delay(), Duration::from_secs(2));
        assert!(!config.server.static_files.enabled);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_provider_names() {
        let provider: ImageProvider = serde_json::from_str("\"disabled\"").unwrap();
        assert_eq!(provider, ImageProvider::Disabled);
        let provider: StoryProvider = serde_json::from_str("\"fake\"").unwrap();
        assert_eq!(provider, StoryProvider::Fake);
    }
}
