pub mod config;
pub mod controller;
pub mod http_client;
pub mod listener;
pub mod rate_limit;
pub mod session;
pub mod transport;

pub use controller::{CanvasClient, SyncState};
pub use listener::{CanvasEvent, CanvasListener, ChannelListener};
