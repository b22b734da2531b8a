use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Respects `RUST_LOG`, defaulting
/// to `info` for the crate family so a bare `RUST_LOG=` still shows cycle
/// summaries and warnings.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("riftwatch=info,warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
