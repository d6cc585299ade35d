use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Маркер класса окна Проводника (окна вида "CabinetWClass")
pub const DEFAULT_TARGET_CLASS: &str = "CabinetWClass";
/// Размер буфера под имя класса окна (MAX_CLASS_NAME)
pub const DEFAULT_CLASS_NAME_CAPACITY: usize = 256;
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub classifier: ClassifierConfig,
    pub host: HostConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// 0 отключает кэширование: каждый запрос идёт в оконную систему
    pub capacity: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    pub target_class: String,
    pub class_name_capacity: usize,
    #[serde(default)]
    pub restrict_to_target_windows: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostConfig {
    pub backend: String,
    pub polling_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
            cache: CacheConfig {
                capacity: DEFAULT_CACHE_CAPACITY,
            },
            classifier: ClassifierConfig {
                target_class: DEFAULT_TARGET_CLASS.to_string(),
                class_name_capacity: DEFAULT_CLASS_NAME_CAPACITY,
                restrict_to_target_windows: false,
            },
            host: HostConfig {
                backend: "xdotool".to_string(),
                polling_interval_ms: 500,
            },
        }
    }
}

impl Config {
    /// Загрузка: значения по умолчанию <- TOML-файл <- переменные окружения LVG_*
    /// (вложенные ключи через `__`, например `LVG_CACHE__CAPACITY=64`)
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("LVG_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.classifier.target_class.is_empty() {
            anyhow::bail!("target_class не может быть пустым");
        }

        if self.classifier.class_name_capacity == 0 {
            anyhow::bail!("class_name_capacity должно быть больше 0");
        }

        match self.host.backend.as_str() {
            "xdotool" | "dry_run" => {}
            _ => anyhow::bail!("Неверный backend оконной системы: {}", self.host.backend),
        }

        if self.host.polling_interval_ms < 50 {
            anyhow::bail!("polling_interval_ms должно быть минимум 50");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache.capacity, 128);
        assert_eq!(config.classifier.target_class, "CabinetWClass");
        assert!(!config.classifier.restrict_to_target_windows);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.classifier.class_name_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.target_class.clear();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.host.backend = "wayland".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cache_capacity_is_allowed() {
        let mut config = Config::default();
        config.cache.capacity = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_merges_file_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "gate.toml",
                r#"
                [cache]
                capacity = 16

                [classifier]
                target_class = "CabinetWClass"
                class_name_capacity = 64
                restrict_to_target_windows = true
                "#,
            )?;
            jail.set_env("LVG_HOST__BACKEND", "dry_run");

            let config = Config::load("gate.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.cache.capacity, 16);
            assert_eq!(config.classifier.class_name_capacity, 64);
            assert!(config.classifier.restrict_to_target_windows);
            assert_eq!(config.host.backend, "dry_run");
            // Незаданные секции берутся из значений по умолчанию
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("gate.toml", "[host]\nbackend = \"dbus\"\npolling_interval_ms = 500\n")?;
            assert!(Config::load("gate.toml").is_err());
            Ok(())
        });
    }
}
