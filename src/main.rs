use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use wininput::config::Config;
use wininput::pump::{create_message_source, run_pump};
use wininput::utils::permissions;

#[derive(Parser, Debug)]
#[command(name = "wininput")]
#[command(about = "Модель ввода окна: клавиатура и мышь из сообщений оконного протокола")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "wininput.toml")]
    config: String,

    /// Воспроизвести сценарий вместо чтения устройств
    #[arg(short, long)]
    script: Option<String>,

    /// Режим сухого запуска (без открытия устройств)
    #[arg(long)]
    dry_run: bool,

    /// Уровень логирования (перекрывает logging.level)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let mut config = Config::load(&args.config)?;
    if let Some(script) = &args.script {
        config.use_script(script);
        config.validate()?;
    }

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(&format!("{},{}", level, config.logging.filter), &config.logging.format)?;

    info!("Запуск wininput v{}", env!("CARGO_PKG_VERSION"));
    info!("Конфигурация загружена из: {}", args.config);

    if args.dry_run {
        warn!("Режим сухого запуска - устройства не открываются");
    }

    // Проверка прав доступа нужна только при чтении устройств
    if config.source.mode == "devices" && !args.dry_run {
        if let Err(e) = permissions::check_permissions() {
            warn!("{}", e);
            for line in permissions::get_setup_commands() {
                warn!("{}", line);
            }
        }
    }

    let source = create_message_source(&config, args.dry_run)?;
    let exit_code = run_pump(&config, source).await?;

    info!("wininput завершил работу с кодом {}", exit_code);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn init_tracing(directive: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))?;

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        "full" => registry.with(tracing_subscriber::fmt::layer()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
    }

    Ok(())
}
