use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use listview_gate::config::Config;
use listview_gate::services::{
    create_window_host, ForegroundPoller, ItemsViewGate, SharedRecencyCache, WindowClassifier,
};

#[derive(Parser, Debug)]
#[command(name = "listview-gate")]
#[command(about = "Классификация активного окна и выбор вида списка папки")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "gate.toml")]
    config: String,

    /// Режим сухого запуска (эмуляция оконной системы)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    info!("Запуск listview-gate v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - оконная система эмулируется");
    }

    let host = create_window_host(&config, args.dry_run)?;
    let cache = SharedRecencyCache::with_current_runtime(config.cache.capacity)?;
    let classifier = WindowClassifier::from_config(&config.classifier, host, cache.clone());
    let gate = Arc::new(ItemsViewGate::new(
        classifier,
        config.classifier.restrict_to_target_windows,
    ));

    info!(
        "Кэш окон: ёмкость {}, маркер класса '{}', ограничение: {}",
        config.cache.capacity,
        gate.classifier().target_class(),
        gate.is_restricted()
    );

    let poller = ForegroundPoller::new(
        gate.clone(),
        tokio::time::Duration::from_millis(config.host.polling_interval_ms),
    );
    let poller_handle = tokio::spawn(async move {
        if let Err(e) = poller.run().await {
            error!("Ошибка в ForegroundPoller: {}", e);
        }
    });

    info!("Опрос активного окна запущен");

    wait_for_shutdown(&args.config, &gate).await;

    info!("Завершение работы...");
    poller_handle.abort();

    // Дожидаемся фоновых вставок в кэш (с таймаутом)
    let shutdown_timeout = tokio::time::Duration::from_secs(5);
    match tokio::time::timeout(shutdown_timeout, cache.drain()).await {
        Ok(()) => info!("Фоновые вставки завершены, записей в кэше: {}", cache.size()),
        Err(_) => warn!(
            "Таймаут ожидания фоновых вставок, осталось: {}",
            cache.pending_inserts()
        ),
    }

    info!("listview-gate завершил работу");
    Ok(())
}

/// Ждёт Ctrl+C; на unix по SIGHUP перечитывает настройки
#[cfg(unix)]
async fn wait_for_shutdown(config_path: &str, gate: &ItemsViewGate) {
    use tokio::signal::unix::{signal as unix_signal, SignalKind};

    let mut hangup = match unix_signal(SignalKind::hangup()) {
        Ok(hangup) => hangup,
        Err(e) => {
            warn!("Не удалось подписаться на SIGHUP: {}", e);
            wait_for_ctrl_c().await;
            return;
        }
    };

    loop {
        tokio::select! {
            _ = wait_for_ctrl_c() => return,
            _ = hangup.recv() => {
                info!("Получен SIGHUP: перечитываем настройки");
                match Config::load(config_path) {
                    Ok(config) => gate.reload(&config),
                    Err(e) => error!("Не удалось перечитать конфигурацию: {:#}", e),
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown(_config_path: &str, _gate: &ItemsViewGate) {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Получен сигнал завершения (Ctrl+C)");
        }
        Err(err) => {
            error!("Ошибка при ожидании сигнала завершения: {}", err);
        }
    }
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().compact()).init();
    }

    Ok(())
}
