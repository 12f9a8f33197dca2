//! Capability - 外部能力的可用性
//!
//! 用显式的 Available / Unavailable 代替可空的全局单例，
//! 每个组件在构造时就明确依赖的能力是否存在

use std::fmt;
use std::sync::Arc;

/// 外部能力（模型客户端、对象存储等）
pub enum Capability<T: ?Sized> {
    /// 已配置，可在多个连接间共享
    Available(Arc<T>),
    /// 未配置或初始化失败
    Unavailable { reason: String },
}

impl<T: ?Sized> Capability<T> {
    pub fn available(inner: Arc<T>) -> Self {
        Self::Available(inner)
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// 获取能力；不可用时返回原因
    pub fn get(&self) -> Result<&Arc<T>, &str> {
        match self {
            Self::Available(inner) => Ok(inner),
            Self::Unavailable { reason } => Err(reason),
        }
    }
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Available(inner) => Self::Available(inner.clone()),
            Self::Unavailable { reason } => Self::Unavailable {
                reason: reason.clone(),
            },
        }
    }
}

impl<T: ?Sized> fmt::Debug for Capability<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(_) => f.write_str("Available"),
            Self::Unavailable { reason } => write!(f, "Unavailable({})", reason),
        }
    }
}
