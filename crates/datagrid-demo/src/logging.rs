//! Logging setup using `tracing-subscriber`.
//!
//! `RUST_LOG` wins when set; otherwise the `-v` count picks the level for
//! the grid crates and everything else stays at `warn`.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level for a `-v` count: none is `info`, one is `debug`, more is `trace`.
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,gridview={level},datagrid={level},datagrid_seeker={level},datagrid_render={level}",
            level = level.as_str().to_lowercase()
        ))
    })
}

/// Installs the global subscriber, writing to stderr.
pub fn init_logging(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level_from_verbosity(verbosity)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
