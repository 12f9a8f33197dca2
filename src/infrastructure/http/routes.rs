//! HTTP Routes
//!
//! Endpoints:
//! - /              GET  服务信息
//! - /health        GET  健康检查
//! - /ws/{user_id}  WS   故事生成（事件流）

use axum::{routing::get, Router};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/ws/:user_id", get(handlers::story_websocket_handler))
}
