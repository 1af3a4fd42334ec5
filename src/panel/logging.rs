use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured logging with configurable log levels
///
/// The `RUST_LOG` environment variable takes precedence over the configured
/// default level. Examples:
/// - `RUST_LOG=debug` - Debug level and above
/// - `RUST_LOG=netbounce=debug` - Debug level for netbounce only
/// - `RUST_LOG=warn` - Warn level and above
pub fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level.to_string())),
        )
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .with_line_number(true)
                .with_file(true),
        )
        .init();
}
