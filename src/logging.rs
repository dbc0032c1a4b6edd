use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging on stderr.
///
/// `RUST_LOG` wins when set. Otherwise the level comes from the number of
/// `-v` flags: none is `warn`, one is `debug`, more is `trace`.
pub fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
