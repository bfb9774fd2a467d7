use tracing_subscriber::EnvFilter;

/// Initialize tracing for the binaries.
///
/// Mapping:
/// - 0 -> warn
/// - 1 -> info
/// - 2 -> debug
/// - 3+ -> trace
///
/// `RUST_LOG` overrides the level if set. Output goes to stderr so the
/// interactive CLI keeps stdout for its own rendering.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("attendance_calendar={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Verbosity from `ATTENDANCE_CALENDAR_VERBOSE` (a count, default 0).
pub fn verbosity_from_env() -> u8 {
    std::env::var("ATTENDANCE_CALENDAR_VERBOSE")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}
