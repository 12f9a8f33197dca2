//! Image Adapter - 图片模型客户端实现

mod fake_image_client;
mod imagen_client;

pub use fake_image_client::FakeImageClient;
pub use imagen_client::{ImagenClient, ImagenClientConfig};
