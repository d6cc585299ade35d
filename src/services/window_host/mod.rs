//! WindowHost: the window-system boundary
//!
//! Implementations answer exactly two synchronous, side-effect-free questions:
//! which window is in the foreground, and what class name a window carries.
//! Classification and caching live in `WindowClassifier`, never here.

mod dry_run;
mod xdotool;
mod r#trait;

pub use self::dry_run::DryRunHost;
pub use self::r#trait::{bounded_class_name, create_window_host, WindowHost};
pub use self::xdotool::XdotoolHost;
