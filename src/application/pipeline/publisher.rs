//! Artifact Publisher
//!
//! 两步策略：对象存储（Durable）→ base64 内联（Inline）。
//! 永远不返回错误，上传失败只记录在 `bucket_error`

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::ports::{Capability, ObjectStoragePort};
use crate::domain::illustration::Publication;

/// 提示词在对象名中保留的最大字符数
const PROMPT_HEAD_CHARS: usize = 30;

/// 发布上下文
#[derive(Debug, Clone)]
pub struct PublishContext<'a> {
    /// 生成该图片的提示词（用于对象名）
    pub prompt: &'a str,
    /// 同一次调用中的图片序号
    pub image_index: usize,
    /// png / jpeg
    pub format: &'a str,
}

/// Artifact Publisher
pub struct ArtifactPublisher {
    storage: Capability<dyn ObjectStoragePort>,
    object_prefix: String,
    /// Durable 时是否同时附带 base64
    attach_inline_copy: bool,
}

impl ArtifactPublisher {
    pub fn new(
        storage: Capability<dyn ObjectStoragePort>,
        object_prefix: impl Into<String>,
        attach_inline_copy: bool,
    ) -> Self {
        Self {
            storage,
            object_prefix: object_prefix.into(),
            attach_inline_copy,
        }
    }

    /// 仅内联，不尝试对象存储
    pub fn inline_only() -> Self {
        Self::new(Capability::unavailable("durable storage not configured"), "", false)
    }

    /// 发布图片
    pub async fn publish(&self, bytes: &[u8], ctx: &PublishContext<'_>) -> Publication {
        let storage = match self.storage.get() {
            Ok(storage) => storage,
            Err(_) => {
                tracing::debug!(size = bytes.len(), "Durable storage not configured, publishing inline");
                return Publication::inline(BASE64.encode(bytes));
            }
        };

        let key = object_key(
            &self.object_prefix,
            ctx.prompt,
            ctx.image_index,
            ctx.format,
            Utc::now(),
            Uuid::new_v4(),
        );

        match storage.upload(&key, bytes, content_type(ctx.format)).await {
            Ok(url) => {
                tracing::info!(key = %key, size = bytes.len(), storage_mode = "durable", "Image uploaded");
                let copy = self.attach_inline_copy.then(|| BASE64.encode(bytes));
                Publication::durable(url, copy)
            }
            Err(e) => {
                tracing::warn!(
                    key = %key,
                    error = %e,
                    storage_mode = "inline",
                    "Upload failed, falling back to inline image"
                );
                Publication::inline(BASE64.encode(bytes)).with_bucket_error(e.to_string())
            }
        }
    }
}

/// 图片 MIME 类型
pub fn content_type(format: &str) -> &'static str {
    match format {
        "jpeg" | "jpg" => "image/jpeg",
        _ => "image/png",
    }
}

/// 对象名: `<prefix>/<时间戳>_<提示词头部>_<序号>_<8 位 uuid>.<格式>`
pub fn object_key(
    prefix: &str,
    prompt: &str,
    image_index: usize,
    format: &str,
    now: DateTime<Utc>,
    id: Uuid,
) -> String {
    let head: String = prompt
        .chars()
        .take(PROMPT_HEAD_CHARS)
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let head = head.trim_end().replace(' ', "_");

    let simple = id.simple().to_string();
    let short_id = &simple[..8];
    let extension = if format == "jpeg" { "jpg" } else { "png" };

    let name = format!(
        "{}_{}_{}_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        head,
        image_index,
        short_id,
        extension
    );

    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name
    } else {
        format!("{}/{}", prefix, name)
    }
}
