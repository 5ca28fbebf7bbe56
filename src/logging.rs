use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count. Debug builds start one level chattier.
pub fn default_filter(verbosity: u8) -> &'static str {
    let base = if cfg!(debug_assertions) { 1 } else { 0 };
    match verbosity.saturating_add(base) {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the verbosity; a
/// second call is a no-op.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
