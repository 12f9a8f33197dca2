//! Delivery Channel Port - 出站事件流
//!
//! 保证发送顺序；客户端断开后所有发送返回 ChannelClosed

use async_trait::async_trait;
use thiserror::Error;

use crate::application::events::StoryEvent;

/// 投递通道已关闭（客户端断开）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("delivery channel closed")]
pub struct ChannelClosed;

/// Delivery Channel
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// 按调用顺序投递事件；队列满时等待（背压）
    async fn send(&self, event: StoryEvent) -> Result<(), ChannelClosed>;
}
