//! Optional tracing init for binaries/tests embedding the aligner crates
//!
//! The library never calls this itself; it only emits `tracing` spans and
//! events for whatever subscriber the caller installs.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber reading the `ALIGN_LOG` env var (default
/// `warn`). Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("ALIGN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
