//! Classifies the foreground window by class name behind a bounded LRU cache,
//! and decides on that basis whether a folder view keeps the classic
//! SysListView32 layout.

pub mod config;
pub mod error;
pub mod events;
pub mod services;
pub mod utils;

pub use config::Config;
pub use error::{GateError, Result};
pub use events::{Classification, Decision, WindowHandle};
pub use services::{
    BoundedRecencyCache, ItemsViewGate, SharedRecencyCache, WindowClassifier, WindowHost,
};
