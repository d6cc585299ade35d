pub mod window;

pub use window::{Classification, Decision, WindowHandle};
