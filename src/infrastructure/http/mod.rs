//! HTTP Layer - 健康检查 + WebSocket

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_routes;
pub use server::{HttpServer, ServerConfig, StaticMount};
pub use state::AppState;
