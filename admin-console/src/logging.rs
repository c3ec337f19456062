//! Logging setup

use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,admin_console=debug,store_client=debug";

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global stdout subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Returns `false` when a global
/// subscriber was already installed, which is not an error.
pub fn init(default_filter: &str) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let stdout_layer = fmt::layer()
        .with_timer(LocalTimer)
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stdout);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init()
        .is_ok()
}
