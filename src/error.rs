use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Ошибка запроса к оконной системе: {0}")]
    HostQuery(String),

    #[error("Нет доступного runtime для фоновых задач: {0}")]
    NoRuntime(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl GateError {
    pub fn host_query<T>(msg: impl Into<String>) -> Result<T> {
        Err(GateError::HostQuery(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, GateError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! gate_error {
    (host_query, $($arg:tt)*) => {
        $crate::error::GateError::HostQuery(format!($($arg)*))
    };
    (no_runtime, $($arg:tt)*) => {
        $crate::error::GateError::NoRuntime(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::GateError::Internal(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_builds_variants() {
        let err = gate_error!(host_query, "xdotool вернул код {}", 1);
        assert!(matches!(err, GateError::HostQuery(ref m) if m == "xdotool вернул код 1"));

        let err = gate_error!(no_runtime, "нет runtime");
        assert!(matches!(err, GateError::NoRuntime(_)));
    }

    #[test]
    fn test_host_query_helper() {
        let result: Result<String> = GateError::host_query("нет окна");
        assert!(matches!(result, Err(GateError::HostQuery(_))));
    }
}
