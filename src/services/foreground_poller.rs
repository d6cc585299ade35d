use super::view_gate::{ItemsViewGate, ViewDecision};
use crate::error::Result;
use crate::events::WindowHandle;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::info;

/// Периодически спрашивает шлюз о виде списка и сообщает об изменениях.
/// Заменяет вызов из перехваченной функции, когда утилита работает автономно.
pub struct ForegroundPoller {
    gate: Arc<ItemsViewGate>,
    polling_interval: Duration,
    last_decision: Option<ViewDecision>,
}

fn decision_handle(decision: &ViewDecision) -> Option<WindowHandle> {
    decision.classification.and_then(|c| c.handle)
}

impl ForegroundPoller {
    pub fn new(gate: Arc<ItemsViewGate>, polling_interval: Duration) -> Self {
        Self {
            gate,
            polling_interval,
            last_decision: None,
        }
    }

    /// Returns `true` when the decision or the foreground window changed.
    pub fn poll_once(&mut self) -> bool {
        let decision = self.gate.evaluate();

        let changed = match &self.last_decision {
            Some(previous) => {
                previous.use_items_view != decision.use_items_view
                    || decision_handle(previous) != decision_handle(&decision)
            }
            None => true,
        };

        if changed {
            let view = if decision.use_items_view { "ItemsView" } else { "SysListView32" };
            match decision.classification {
                Some(classification) => info!("{} => {}", classification, view),
                None => info!("Ограничение выключено => {}", view),
            }
        }

        self.last_decision = Some(decision);
        changed
    }

    pub async fn run(mut self) -> Result<()> {
        info!("Опрос активного окна каждые {:?}", self.polling_interval);

        let mut ticker = interval(self.polling_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            self.poll_once();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::classifier::tests::CountingHost;
    use crate::services::{SharedRecencyCache, WindowClassifier};

    fn poller(host: Arc<CountingHost>, restrict: bool) -> ForegroundPoller {
        let cache = SharedRecencyCache::with_current_runtime(8).unwrap();
        let classifier = WindowClassifier::new(host, cache, "CabinetWClass", 256);
        let gate = Arc::new(ItemsViewGate::new(classifier, restrict));
        ForegroundPoller::new(gate, Duration::from_millis(50))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_reports_only_changes() {
        let host = Arc::new(CountingHost::with_window(0x1, "CabinetWClass"));
        host.add_window(0x2, "CabinetWClassEx");
        host.add_window(0x3, "Progman");
        let mut poller = poller(host.clone(), true);

        assert!(poller.poll_once());
        assert!(!poller.poll_once());

        // Другое окно Проводника: решение то же, но окно сменилось
        host.focus(0x2);
        assert!(poller.poll_once());

        host.focus(0x3);
        assert!(poller.poll_once());
        assert!(!poller.poll_once());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_unrestricted_poll_is_stable() {
        let host = Arc::new(CountingHost::with_window(0x1, "Progman"));
        let mut poller = poller(host.clone(), false);

        assert!(poller.poll_once());
        host.focus(0x2);
        assert!(!poller.poll_once());
        assert_eq!(host.queries(), 0);
    }
}
