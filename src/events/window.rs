use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;

/// Непрозрачный дескриптор окна. Нулевой дескриптор не представим:
/// "нет окна" выражается через `Option<WindowHandle>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowHandle(NonZeroU64);

impl WindowHandle {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn raw(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0.get())
    }
}

/// Какая ветка классификатора дала ответ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    NoForegroundWindow,
    CacheHit,
    CacheMiss,
    ClassNameUnavailable,
}

/// Результат одной классификации активного окна
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub handle: Option<WindowHandle>,
    pub decision: Decision,
    pub is_target: bool,
}

impl Classification {
    pub fn no_foreground() -> Self {
        Self {
            handle: None,
            decision: Decision::NoForegroundWindow,
            is_target: false,
        }
    }

    pub fn cached(handle: WindowHandle, is_target: bool) -> Self {
        Self {
            handle: Some(handle),
            decision: Decision::CacheHit,
            is_target,
        }
    }

    pub fn looked_up(handle: WindowHandle, is_target: bool) -> Self {
        Self {
            handle: Some(handle),
            decision: Decision::CacheMiss,
            is_target,
        }
    }

    pub fn unavailable(handle: WindowHandle) -> Self {
        Self {
            handle: Some(handle),
            decision: Decision::ClassNameUnavailable,
            is_target: false,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.handle {
            Some(handle) => write!(f, "{:?} {} -> {}", self.decision, handle, self.is_target),
            None => write!(f, "{:?} -> {}", self.decision, self.is_target),
        }
    }
}
