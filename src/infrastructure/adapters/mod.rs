//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod image;
pub mod storage;
pub mod story;

pub use image::*;
pub use storage::*;
pub use story::*;
