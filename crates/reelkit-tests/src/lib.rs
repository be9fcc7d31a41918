//! Integration test crate for reelkit.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It drives reelkit-player feeds with reelkit-core configs and checks the
//! scroll scenarios end to end.

#[cfg(test)]
mod scenarios;

#[cfg(test)]
mod circular;


/// Install a test-friendly tracing subscriber once. Honors `RUST_LOG`.
#[cfg(test)]
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
