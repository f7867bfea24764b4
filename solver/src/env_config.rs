//! Shared environment configuration for the optimizer binaries.
//!
//! Consolidates `RUST_LOG`, `RAYON_NUM_THREADS`, and `ARTIFACT_PORT` reads.

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Filter from `RUST_LOG`, default `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Ignore the error when a subscriber is already installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`, default 8) and build
/// the rayon global pool. Tolerates an already-initialized pool.
pub fn init_rayon_threads() -> usize {
    let num_threads = std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8);
    if rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .is_err()
    {
        tracing::debug!("rayon global pool already initialized");
    }
    tracing::info!(num_threads, "rayon threads");
    num_threads
}

/// Read `ARTIFACT_PORT` (default 9000).
pub fn server_port() -> u16 {
    std::env::var("ARTIFACT_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(9000)
}
