use clap::Parser;
use marina::domain::ports::Storage;
use marina::utils::{logger, validation::Validate};
use marina::{CliConfig, Dispatcher, LocalStorage, Registry};
use std::io;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    let settings = match config.into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_cli_logger(settings.verbose, settings.log_level.as_deref());
    tracing::debug!("Settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::from_config(&settings);
    let mut registry = Registry::from_config(&settings);

    // 讀檔失敗時從空的登錄開始
    let report = registry.load_or_empty(&storage);
    tracing::info!(
        "Loaded {} boats from {} ({} skipped{})",
        report.loaded,
        storage.describe(),
        report.skipped,
        if report.truncated { ", capacity reached" } else { "" }
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut dispatcher = Dispatcher::new(registry, storage, stdin.lock(), stdout.lock());
    dispatcher.run()?;

    Ok(())
}
