use passvault_core::Environment;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the environment's
/// default filter.
pub fn init_tracing(env: Environment) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(env.default_log_filter()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if env.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }
}
