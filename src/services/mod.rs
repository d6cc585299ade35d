pub mod classifier;
pub mod foreground_poller;
pub mod recency_cache;
pub mod shared_cache;
pub mod view_gate;
pub mod window_host;

pub use classifier::WindowClassifier;
pub use foreground_poller::ForegroundPoller;
pub use recency_cache::BoundedRecencyCache;
pub use shared_cache::SharedRecencyCache;
pub use view_gate::{ItemsViewGate, ViewDecision};
pub use window_host::{create_window_host, WindowHost};
