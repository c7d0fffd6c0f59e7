use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
	/// The service answered with a non-success status. The message names the operation that failed, the response body is not inspected.
	#[error("{message}")]
	Service {
		message: &'static str,
		status: reqwest::StatusCode,
	},
	/// The request never produced a response, for example because the connection was refused or timed out.
	#[error("network error: {0}")]
	Network(#[source] reqwest::Error),
	/// The response body did not have the expected shape.
	#[error("Invalid response shape")]
	InvalidResponse(#[source] Box<dyn std::error::Error + Send + Sync>),
	#[error("invalid input: {0}")]
	InvalidInput(String),
}

impl Error {
	pub(crate) fn invalid_response<E>(error: E) -> Error
	where
		E: Into<Box<dyn std::error::Error + Send + Sync>>,
	{
		Error::InvalidResponse(error.into())
	}

	/// The status code of the response, if the service answered at all.
	pub fn status(&self) -> Option<reqwest::StatusCode> {
		match self {
			Error::Service { status, .. } => Some(*status),
			Error::Network(error) => error.status(),
			_ => None,
		}
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Network(error) if error.is_timeout())
	}
}

#[test]
fn test_display() {
	let error = Error::Service {
		message: "Failed to fetch metrics data",
		status: reqwest::StatusCode::NOT_FOUND,
	};
	assert_eq!(error.to_string(), "Failed to fetch metrics data");
	assert_eq!(error.status(), Some(reqwest::StatusCode::NOT_FOUND));
	let error = Error::invalid_response("missing field `labels`");
	assert_eq!(error.to_string(), "Invalid response shape");
	let source = std::error::Error::source(&error).unwrap();
	assert_eq!(source.to_string(), "missing field `labels`");
	assert!(!error.is_timeout());
}
