use super::r#trait::{bounded_class_name, WindowHost};
use crate::error::Result;
use crate::events::WindowHandle;
use crate::gate_error;
use std::process::Command;
use tracing::debug;

/// X11 host backed by the `xdotool` utility. Window ids are the X11 ids
/// printed by `xdotool getactivewindow`.
pub struct XdotoolHost;

impl XdotoolHost {
    pub fn new() -> Self {
        Self
    }

    pub fn test(&self) -> Result<()> {
        Self::run(&["version"]).map(|_| ())
    }

    fn run(args: &[&str]) -> Result<String> {
        let output = Command::new("xdotool").args(args).output().map_err(|e| {
            debug!("xdotool не найден или не работает: {}", e);
            gate_error!(host_query, "xdotool не найден: {}", e)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("xdotool {:?} вернул ошибку: {}", args, stderr.trim());
            return Err(gate_error!(host_query, "xdotool вернул ошибку: {}", stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for XdotoolHost {
    fn default() -> Self {
        Self::new()
    }
}

/// Разбор вывода `xdotool getactivewindow`: десятичный id, 0 означает "нет окна"
fn parse_window_id(stdout: &str) -> Option<WindowHandle> {
    stdout.trim().parse::<u64>().ok().and_then(WindowHandle::new)
}

impl WindowHost for XdotoolHost {
    fn foreground_window(&self) -> Option<WindowHandle> {
        match Self::run(&["getactivewindow"]) {
            Ok(stdout) => parse_window_id(&stdout),
            Err(e) => {
                debug!("Не удалось получить активное окно: {}", e);
                None
            }
        }
    }

    fn class_name(&self, handle: WindowHandle, capacity: usize) -> Result<String> {
        let id = handle.raw().to_string();
        let stdout = Self::run(&["getwindowclassname", &id])?;
        let class_name = stdout.trim_end_matches(['\r', '\n']);
        debug!("xdotool получил класс окна {}: '{}'", handle, class_name);
        bounded_class_name(class_name, capacity)
    }
}
