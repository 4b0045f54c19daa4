use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Initialize tracing for the embedding application.
///
/// The engine itself only emits events; the host process decides where they
/// go. `format = "pretty"` enables human-readable output for development,
/// anything else stays on the default single-line output. Calling this twice
/// is harmless.
pub fn init_tracing(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.clone()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let result = if settings.format == "pretty" {
        subscriber.pretty().try_init()
    } else {
        subscriber.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}
