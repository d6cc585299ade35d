use super::r#trait::{bounded_class_name, WindowHost};
use crate::error::{GateError, Result};
use crate::events::WindowHandle;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Сколько опросов подряд эмулируемое окно остаётся активным
const DWELL_QUERIES: usize = 4;

/// Emulated window system: cycles through a fixed set of fake windows,
/// staying on each one for a few foreground queries so cache hits show up.
pub struct DryRunHost {
    classes: DashMap<WindowHandle, String>,
    script: Vec<Option<WindowHandle>>,
    queries: AtomicUsize,
}

impl DryRunHost {
    pub fn new() -> Self {
        let classes = DashMap::new();
        let mut script = Vec::new();

        let fake_windows: [(u64, Option<&str>); 5] = [
            (0x0001_0010, Some("CabinetWClass")),
            (0x0001_0020, Some("Progman")),
            (0x0001_0030, Some("Shell_TrayWnd")),
            // Окно "закрылось" между запросами: имя класса недоступно
            (0x0001_0040, None),
            (0x0001_0050, Some("CabinetWClass")),
        ];

        for (raw, class) in fake_windows {
            if let Some(handle) = WindowHandle::new(raw) {
                if let Some(class) = class {
                    classes.insert(handle, class.to_string());
                }
                script.push(Some(handle));
            }
        }
        // Фокус ни на одном окне
        script.push(None);

        Self {
            classes,
            script,
            queries: AtomicUsize::new(0),
        }
    }
}

impl Default for DryRunHost {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowHost for DryRunHost {
    fn foreground_window(&self) -> Option<WindowHandle> {
        let query = self.queries.fetch_add(1, Ordering::Relaxed);
        let window = self.script[(query / DWELL_QUERIES) % self.script.len()];
        debug!("Dry-run: активное окно {:?}", window.map(|h| h.to_string()));
        window
    }

    fn class_name(&self, handle: WindowHandle, capacity: usize) -> Result<String> {
        match self.classes.get(&handle) {
            Some(class) => bounded_class_name(class.value(), capacity),
            None => Err(GateError::HostQuery(format!("окно {} не существует", handle))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_dwells_on_each_window() {
        let host = DryRunHost::new();
        let first = host.foreground_window();
        for _ in 1..DWELL_QUERIES {
            assert_eq!(host.foreground_window(), first);
        }
        assert_ne!(host.foreground_window(), first);
    }

    #[test]
    fn test_script_covers_failure_paths() {
        let host = DryRunHost::new();
        assert!(host.script.contains(&None));

        let missing = WindowHandle::new(0x0001_0040).unwrap();
        assert!(host.class_name(missing, 256).is_err());

        let explorer = WindowHandle::new(0x0001_0010).unwrap();
        assert_eq!(host.class_name(explorer, 256).unwrap(), "CabinetWClass");
    }
}
