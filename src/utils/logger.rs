use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins, then the configured level, then `--verbose`.
pub fn default_filter(verbose: bool, level: Option<&str>) -> String {
    match level {
        Some(level) => format!("marina={}", level),
        None if verbose => "marina=debug".to_string(),
        None => "marina=warn".to_string(),
    }
}

/// Logs go to stderr so they never interleave with the interactive menu on stdout.
pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
