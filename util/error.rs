pub use anyhow::{Context, Error};

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

/// Create an [`Error`](type.Error.html) from a format string.
#[macro_export]
macro_rules! err {
	($($arg:tt)*) => {
		$crate::error::Error::msg(format!($($arg)*))
	};
}

#[test]
fn test_err() {
	let error = err!("unknown model {:?}", "lr");
	assert_eq!(error.to_string(), "unknown model \"lr\"");
	let result: Result<()> = Err(error).context("failed to fetch metrics data");
	let error = result.unwrap_err();
	assert_eq!(error.to_string(), "failed to fetch metrics data");
	assert_eq!(error.chain().count(), 2);
}
