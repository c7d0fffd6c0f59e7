use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Configuration for a [`Client`](struct.Client.html).
#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
	/// The url every endpoint path is appended to. It may include a path prefix.
	pub base_url: String,
	/// The total time allowed for one request. `None` leaves the transport default in place.
	pub timeout: Option<Duration>,
}

impl Default for ClientOptions {
	fn default() -> ClientOptions {
		ClientOptions {
			base_url: DEFAULT_BASE_URL.to_owned(),
			timeout: None,
		}
	}
}
