//! Storage Adapter - 对象存储实现

mod gcs_storage;

pub use gcs_storage::{GcsObjectStorage, GcsStorageConfig};
