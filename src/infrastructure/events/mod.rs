//! Events - 出站事件投递

mod channel;

pub use channel::{forward_events, WsDeliveryChannel};
