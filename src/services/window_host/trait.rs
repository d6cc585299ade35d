use super::{DryRunHost, XdotoolHost};
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::events::WindowHandle;
use std::sync::Arc;
use tracing::{info, warn};

/// Window-system queries consumed by the classifier
pub trait WindowHost: Send + Sync {
    /// Current foreground window, `None` when nothing has focus.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Class name of `handle`, at most `capacity - 1` characters.
    ///
    /// A failed query is an `Err`, distinct from an empty class name.
    fn class_name(&self, handle: WindowHandle, capacity: usize) -> Result<String>;
}

/// Fits a class name into a NUL-terminated buffer of `capacity` characters.
pub fn bounded_class_name(name: &str, capacity: usize) -> Result<String> {
    if capacity == 0 {
        return GateError::host_query("буфер имени класса имеет нулевой размер");
    }
    Ok(name.chars().take(capacity - 1).collect())
}

/// Factory function to create a window host based on the backend setting and the dry_run flag
pub fn create_window_host(config: &Config, dry_run: bool) -> Result<Arc<dyn WindowHost>> {
    if dry_run || config.host.backend == "dry_run" {
        info!("Используем эмуляцию оконной системы (dry-run)");
        return Ok(Arc::new(DryRunHost::new()));
    }

    match config.host.backend.as_str() {
        "xdotool" => {
            let host = XdotoolHost::new();
            if let Err(e) = host.test() {
                warn!("xdotool недоступен: {}. Классификация будет возвращать false", e);
            }
            Ok(Arc::new(host))
        }
        other => Err(GateError::Internal(format!(
            "Неизвестный backend оконной системы: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_class_name_truncates_like_c_buffer() {
        assert_eq!(bounded_class_name("CabinetWClass", 256).unwrap(), "CabinetWClass");
        assert_eq!(bounded_class_name("CabinetWClass", 8).unwrap(), "Cabinet");
        assert_eq!(bounded_class_name("CabinetWClass", 1).unwrap(), "");
        assert!(bounded_class_name("CabinetWClass", 0).is_err());
    }

    #[test]
    fn test_factory_prefers_dry_run() {
        let config = Config::default();
        let host = create_window_host(&config, true).unwrap();
        assert!(host.foreground_window().is_some());
    }

    #[test]
    fn test_factory_rejects_unknown_backend() {
        let mut config = Config::default();
        config.host.backend = "sway".to_string();
        assert!(create_window_host(&config, false).is_err());
    }
}
