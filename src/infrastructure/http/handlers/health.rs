//! Health Handlers
//!
//! 健康检查与服务信息

use axum::Json;

use crate::infrastructure::http::dto::{HealthResponse, ServiceInfoResponse};

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "storygen-backend",
    })
}

/// GET /
pub async fn root() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        message: "StoryGen Backend API",
        version: env!("CARGO_PKG_VERSION"),
        workflow: "sequential",
    })
}
