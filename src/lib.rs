//! StoryGen - 关键词生成四幕绘本故事
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story: 故事文档、解析与文本渲染
//! - Illustration: 场景提示词与图片结果
//!
//! 应用层 (application/):
//! - Ports: 端口定义（StoryModel, ImageModel, ObjectStorage, DeliveryChannel）
//! - Pipeline: 故事生成 → 场景插图 → 事件下发
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: 健康检查 + WebSocket
//! - Adapters: Gemini, Imagen, GCS 以及本地假实现
//! - Events: WebSocket 事件队列
//! - Bootstrap: 按配置装配能力

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
