//! Tracing setup for embedding hosts.

use tracing_subscriber::EnvFilter;

/// Initialize a fmt subscriber with env-filter support.
///
/// `RUST_LOG` takes precedence over the configured level. Safe to call more
/// than once; later calls are ignored.
pub fn init_tracing(service_name: &str, log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::info!(service = service_name, "tracing initialized");
    }
}
