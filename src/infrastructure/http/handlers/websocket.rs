//! Story WebSocket Handler
//!
//! 每个连接：connected → 逐条处理客户端消息。
//! generate_story 在接收循环中同步运行完整流程，同一连接上不会并发两次生成

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::IntoResponse,
};
use futures_util::StreamExt;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::events::StoryEvent;
use crate::application::ports::DeliveryChannel;
use crate::infrastructure::events::{forward_events, WsDeliveryChannel};
use crate::infrastructure::http::dto::ClientMessage;
use crate::infrastructure::http::state::AppState;

/// 出站队列容量
const EVENT_QUEUE_CAPACITY: usize = 32;

/// GET /ws/:user_id
pub async fn story_websocket_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_story_socket(socket, user_id, state))
}

async fn handle_story_socket(socket: WebSocket, user_id: String, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let (sender, mut receiver) = socket.split();

    let (channel, event_rx) = WsDeliveryChannel::new(EVENT_QUEUE_CAPACITY);
    let forward_task = tokio::spawn(forward_events(event_rx, sender, connection_id));

    tracing::info!(connection_id = %connection_id, user_id = %user_id, "WebSocket connected");

    if channel.send(StoryEvent::connected()).await.is_ok() {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    if !handle_client_text(&text, &channel, &state, connection_id, &user_id).await {
                        break;
                    }
                }
                Ok(Message::Binary(data)) => {
                    tracing::debug!(
                        connection_id = %connection_id,
                        size = data.len(),
                        "Ignoring binary message"
                    );
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_id, "WebSocket closed by client");
                    break;
                }
                Ok(_) => {
                    // Ping/Pong 帧由 axum 处理
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    }

    drop(channel);
    let _ = forward_task.await;
    tracing::info!(connection_id = %connection_id, user_id = %user_id, "WebSocket disconnected");
}

/// 处理一条文本消息，返回 false 表示连接已不可用
async fn handle_client_text(
    text: &str,
    channel: &WsDeliveryChannel,
    state: &AppState,
    connection_id: Uuid,
    user_id: &str,
) -> bool {
    let message = match ClientMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            let head: String = text.chars().take(100).collect();
            tracing::warn!(
                connection_id = %connection_id,
                error = %e,
                message = %head,
                "Ignoring unrecognized client message"
            );
            return true;
        }
    };

    match message {
        ClientMessage::GenerateStory { data } => {
            tracing::info!(
                connection_id = %connection_id,
                user_id = %user_id,
                topic = %data,
                "Story generation requested"
            );

            if channel.send(StoryEvent::processing()).await.is_err() {
                return false;
            }
            state.story_pipeline.run(&data, channel).await;
            !channel.is_closed()
        }
        ClientMessage::Ping => channel.send(StoryEvent::Pong).await.is_ok(),
    }
}
