//! Logging bootstrap shared by binaries and examples.

/// Initializes the tracing/logging infrastructure.
///
/// Structured logging with environment-based filtering: set `RUST_LOG` to
/// control verbosity, e.g. `RUST_LOG=info` globally or
/// `RUST_LOG=chat_model=trace` for toolkit internals only. Call once, early.
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Client started");
/// ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
