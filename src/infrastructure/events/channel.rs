//! WebSocket Delivery Channel
//!
//! 每个连接一个有序 mpsc 队列 + 一个写任务。
//! 写失败后写任务退出并丢弃接收端，之后的发送都返回 ChannelClosed

use async_trait::async_trait;
use axum::extract::ws::Message;
use futures_util::{Sink, SinkExt};
use std::fmt::Display;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::application::events::StoryEvent;
use crate::application::ports::{ChannelClosed, DeliveryChannel};

/// 基于 mpsc 的投递通道
#[derive(Clone)]
pub struct WsDeliveryChannel {
    tx: mpsc::Sender<StoryEvent>,
}

impl WsDeliveryChannel {
    /// 创建通道，返回发送端与写任务使用的接收端
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<StoryEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// 写任务是否已经退出
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[async_trait]
impl DeliveryChannel for WsDeliveryChannel {
    async fn send(&self, event: StoryEvent) -> Result<(), ChannelClosed> {
        self.tx.send(event).await.map_err(|_| ChannelClosed)
    }
}

/// 写任务：按入队顺序把事件写入 socket
///
/// 所有发送端释放后关闭 socket；写失败时立即返回
pub async fn forward_events<S>(mut rx: mpsc::Receiver<StoryEvent>, mut sink: S, connection_id: Uuid)
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let mut sent = 0usize;

    while let Some(event) = rx.recv().await {
        let kind = event.kind();
        let text = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(connection_id = %connection_id, error = %e, "Failed to serialize event");
                continue;
            }
        };

        if let Err(e) = sink.send(Message::Text(text)).await {
            tracing::debug!(
                connection_id = %connection_id,
                event = kind,
                error = %e,
                "Failed to send WebSocket message"
            );
            return;
        }
        sent += 1;
        tracing::trace!(connection_id = %connection_id, event = kind, "Event sent");
    }

    tracing::debug!(connection_id = %connection_id, sent, "Event queue drained, closing socket");
    let _ = sink.close().await;
}
