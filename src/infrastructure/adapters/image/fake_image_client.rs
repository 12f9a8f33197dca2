//! Fake Image Client - 用于本地开发与测试的图片模型
//!
//! 不调用外部服务，始终返回一张 1x1 PNG

use async_trait::async_trait;
use std::time::Duration;

use crate::application::ports::{ImageModelError, ImageModelPort, ImageModelRequest, RawImage};

/// 1x1 透明 PNG
const BLANK_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4,
    0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae,
    0x42, 0x60, 0x82,
];

/// Fake Image Client
pub struct FakeImageClient {
    /// 模拟生成耗时
    latency: Duration,
}

impl FakeImageClient {
    pub fn new(latency: Duration) -> Self {
        tracing::info!(latency_ms = latency.as_millis() as u64, "FakeImageClient initialized");
        Self { latency }
    }

    pub fn with_defaults() -> Self {
        Self::new(Duration::from_millis(200))
    }
}

#[async_trait]
impl ImageModelPort for FakeImageClient {
    async fn generate(&self, request: ImageModelRequest) -> Result<Vec<RawImage>, ImageModelError> {
        tracing::debug!(
            prompt_len = request.prompt.len(),
            aspect_ratio = request.aspect_ratio.as_str(),
            "FakeImageClient: returning blank image"
        );

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let count = request.number_of_images.max(1) as usize;
        Ok(vec![RawImage::png(BLANK_PNG.to_vec()); count])
    }
}
