use super::shared_cache::SharedRecencyCache;
use super::window_host::WindowHost;
use crate::config::ClassifierConfig;
use crate::events::Classification;
use crate::{debug_if_enabled, trace_if_enabled};
use std::sync::Arc;

/// Strict-case substring match of the class marker.
pub fn is_target_class(class_name: &str, marker: &str) -> bool {
    class_name.contains(marker)
}

/// Answers "is the foreground window one of ours?" on the hot path.
///
/// A cached answer is returned without touching the window system. On a
/// miss the class name is queried, the answer returned immediately, and the
/// cache populated in the background. Every failure degrades to `false`.
pub struct WindowClassifier {
    host: Arc<dyn WindowHost>,
    cache: SharedRecencyCache<bool>,
    target_class: Arc<str>,
    class_name_capacity: usize,
}

impl WindowClassifier {
    pub fn new(
        host: Arc<dyn WindowHost>,
        cache: SharedRecencyCache<bool>,
        target_class: impl Into<Arc<str>>,
        class_name_capacity: usize,
    ) -> Self {
        Self {
            host,
            cache,
            target_class: target_class.into(),
            class_name_capacity,
        }
    }

    pub fn from_config(
        config: &ClassifierConfig,
        host: Arc<dyn WindowHost>,
        cache: SharedRecencyCache<bool>,
    ) -> Self {
        Self::new(
            host,
            cache,
            config.target_class.as_str(),
            config.class_name_capacity,
        )
    }

    pub fn classify_foreground(&self) -> bool {
        self.classify_foreground_detailed().is_target
    }

    /// Same as [`classify_foreground`](Self::classify_foreground), also
    /// reporting which branch produced the answer.
    pub fn classify_foreground_detailed(&self) -> Classification {
        trace_if_enabled!("Размер кэша окон: {}", self.cache.size());

        let Some(handle) = self.host.foreground_window() else {
            debug_if_enabled!("Активное окно не найдено");
            return Classification::no_foreground();
        };

        if let Some(cached) = self.cache.try_get(handle) {
            trace_if_enabled!("Окно {}: результат из кэша = {}", handle, cached);
            return Classification::cached(handle, cached);
        }

        let class_name = match self.host.class_name(handle, self.class_name_capacity) {
            Ok(class_name) => class_name,
            Err(e) => {
                debug_if_enabled!("Не удалось получить имя класса окна {}: {}", handle, e);
                return Classification::unavailable(handle);
            }
        };

        let is_target = is_target_class(&class_name, &self.target_class);
        debug_if_enabled!(
            "Окно {} (класс '{}'): промах кэша, целевое = {}",
            handle,
            class_name,
            is_target
        );

        // Не ждём вставку: следующий запрос может снова промахнуться
        let _ = self.cache.insert_async(handle, is_target);

        Classification::looked_up(handle, is_target)
    }

    pub fn cache(&self) -> &SharedRecencyCache<bool> {
        &self.cache
    }

    pub fn target_class(&self) -> &str {
        &self.target_class
    }
}
