use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber for the binaries.
///
/// `RUST_LOG` wins over `level`; both fall back to `warn`. Calling this twice
/// is harmless, the second install is ignored.
pub fn init(level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
