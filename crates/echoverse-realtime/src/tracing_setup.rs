use std::fs::OpenOptions;
use std::sync::Arc;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub fn init_tracing() {
    init_tracing_with_service("echoverse-realtime");
}

pub fn init_tracing_with_service(service_name: &str) {
    // Check if file logging is enabled via environment variable
    let file_logging = std::env::var("ECHOVERSE_LOG_FILE").ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);

    if let Some(log_path) = file_logging {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .expect("Failed to open log file");

        let file_layer = fmt::layer()
            .with_writer(Arc::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);

        registry.with(file_layer).init();
        eprintln!("File logging enabled: {log_path}");
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }

    tracing::debug!(service = service_name, "tracing initialised");
}
