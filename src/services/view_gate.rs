use super::classifier::WindowClassifier;
use crate::config::Config;
use crate::events::Classification;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Outcome of one gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDecision {
    pub use_items_view: bool,
    /// `None` when restriction is off and the classifier was not consulted
    pub classification: Option<Classification>,
}

/// Body of the intercepted `UseItemsView` check.
///
/// The host application asks whether a folder view should use the modern
/// items view. The answer is "no" (keep the classic list view) everywhere,
/// unless restriction to target windows is enabled and the foreground window
/// is not a target window.
pub struct ItemsViewGate {
    classifier: WindowClassifier,
    restrict_to_target_windows: AtomicBool,
}

impl ItemsViewGate {
    pub fn new(classifier: WindowClassifier, restrict_to_target_windows: bool) -> Self {
        Self {
            classifier,
            restrict_to_target_windows: AtomicBool::new(restrict_to_target_windows),
        }
    }

    pub fn use_items_view(&self) -> bool {
        self.evaluate().use_items_view
    }

    pub fn evaluate(&self) -> ViewDecision {
        // Без ограничения классификатор не вызывается вовсе
        if !self.is_restricted() {
            return ViewDecision {
                use_items_view: false,
                classification: None,
            };
        }

        let classification = self.classifier.classify_foreground_detailed();
        ViewDecision {
            use_items_view: !classification.is_target,
            classification: Some(classification),
        }
    }

    pub fn is_restricted(&self) -> bool {
        self.restrict_to_target_windows.load(Ordering::Relaxed)
    }

    /// Перечитывает настройки (аналог перезагрузки настроек мода)
    pub fn reload(&self, config: &Config) {
        let restrict = config.classifier.restrict_to_target_windows;
        let previous = self.restrict_to_target_windows.swap(restrict, Ordering::Relaxed);
        if previous != restrict {
            info!("Ограничение целевыми окнами: {} -> {}", previous, restrict);
        }
    }

    pub fn classifier(&self) -> &WindowClassifier {
        &self.classifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::classifier::tests::CountingHost;
    use crate::services::SharedRecencyCache;
    use std::sync::Arc;

    fn gate(host: Arc<CountingHost>, restrict: bool) -> ItemsViewGate {
        let cache = SharedRecencyCache::with_current_runtime(8).unwrap();
        let classifier = WindowClassifier::new(host, cache, "CabinetWClass", 256);
        ItemsViewGate::new(classifier, restrict)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unrestricted_never_classifies() {
        let host = Arc::new(CountingHost::with_window(0x1, "Progman"));
        let gate = gate(host.clone(), false);

        assert!(!gate.use_items_view());
        assert_eq!(gate.evaluate().classification, None);
        assert_eq!(host.queries(), 0);
        assert_eq!(gate.classifier().cache().pending_inserts(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_restricted_uses_items_view_outside_target_windows() {
        let host = Arc::new(CountingHost::with_window(0x1, "Progman"));
        host.add_window(0x2, "CabinetWClass");
        let gate = gate(host.clone(), true);

        assert!(gate.use_items_view());
        host.focus(0x2);
        assert!(!gate.use_items_view());
        // Нет активного окна: считаем, что это не Проводник
        host.focus(0);
        assert!(gate.use_items_view());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reload_toggles_restriction() {
        let host = Arc::new(CountingHost::with_window(0x1, "Progman"));
        let gate = gate(host.clone(), false);

        let mut config = Config::default();
        config.classifier.restrict_to_target_windows = true;
        gate.reload(&config);
        assert!(gate.is_restricted());
        assert!(gate.use_items_view());

        config.classifier.restrict_to_target_windows = false;
        gate.reload(&config);
        assert!(!gate.use_items_view());
    }
}
