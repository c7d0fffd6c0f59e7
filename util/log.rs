//! Logging setup shared by the binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a compact stderr subscriber filtered by `RUST_LOG`, falling back to `default_filter`.
///
/// Calling this more than once is harmless; only the first subscriber is installed.
pub fn init(default_filter: &str) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
	tracing_subscriber::registry()
		.with(filter)
		.with(fmt::layer().with_writer(std::io::stderr).compact())
		.try_init()
		.ok();
}
