use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use services::{create_config_dispatch, create_windowing_query, Scheduler};
use utils::DeviceFinder;

#[derive(Parser, Debug)]
#[command(name = "ekr-monitor")]
#[command(about = "Переключает раскладку кнопок Wacom ExpressKey Remote при смене режима")]
struct Args {
    /// Дополнительный файл конфигурации (перекрывает системный и пользовательский)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Режим сухого запуска (команды xsetwacom только логируются)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Следить за пультами и применять команды режимов (по умолчанию)
    Monitor,

    /// Открыть файлы remote_mode на чтение всем (требует root)
    FixPermissions {
        /// Частота поиска новых пультов, Гц
        #[arg(default_value_t = utils::permissions::HZ_DEFAULT, value_parser = clap::value_parser!(u32).range(1..=1000))]
        hz: u32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Инициализация системы логирования
    init_tracing(&args.log_level)?;

    info!("Запуск EKR Monitor v{}", env!("CARGO_PKG_VERSION"));

    match args.command.unwrap_or(Command::Monitor) {
        Command::Monitor => run_monitor(args.config, args.dry_run).await?,
        Command::FixPermissions { hz } => {
            utils::permissions::check_root();
            utils::permissions::run_permission_fixer(DeviceFinder::default(), hz, shutdown_signal()).await;
        }
    }

    info!("EKR Monitor завершил работу");
    Ok(())
}

async fn run_monitor(extra_config: Option<PathBuf>, dry_run: bool) -> Result<()> {
    // Загрузка конфигурации
    let config = Config::load(extra_config.as_deref())?;
    info!("Конфигурация загружена, интервал опроса: {} с", config.general.sleep);

    if dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    let scheduler = Scheduler::new(
        config,
        DeviceFinder::default(),
        create_windowing_query(),
        create_config_dispatch(dry_run),
    );

    scheduler.run(shutdown_signal()).await;
    Ok(())
}

/// Ожидание SIGINT или SIGTERM
async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(terminate) => terminate,
        Err(err) => {
            error!("Не удалось подписаться на SIGTERM: {}", err);
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!("Ошибка при ожидании сигнала завершения: {}", err);
            }
            return;
        }
    };

    tokio::select! {
        result = tokio::signal::ctrl_c() => match result {
            Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
            Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
        },
        _ = terminate.recv() => info!("Получен сигнал завершения (SIGTERM)"),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact())
        .init();

    Ok(())
}
