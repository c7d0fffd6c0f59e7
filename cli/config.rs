use rice_client::ClientOptions;
use rice_util::{
	err,
	error::{Context, Result},
};
use std::{path::Path, time::Duration};

/// The contents of a `--config` file.
#[derive(Debug, Default, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
	pub url: Option<String>,
	pub timeout_secs: Option<u64>,
}

impl Config {
	pub fn from_path(path: &Path) -> Result<Config> {
		let bytes = std::fs::read(path)
			.with_context(|| format!("failed to read config file {}", path.display()))?;
		Config::from_slice(&bytes)
			.with_context(|| format!("failed to parse config file {}", path.display()))
	}

	pub fn from_slice(bytes: &[u8]) -> Result<Config> {
		Ok(serde_json::from_slice(bytes)?)
	}
}

/// Build the client options. Values given on the command line win over the config file, which wins over the defaults.
pub fn client_options(
	config: Config,
	url: Option<String>,
	timeout_secs: Option<u64>,
) -> Result<ClientOptions> {
	let defaults = ClientOptions::default();
	let base_url = url.or(config.url).unwrap_or(defaults.base_url);
	let timeout = match timeout_secs.or(config.timeout_secs) {
		Some(0) => return Err(err!("the timeout must be at least one second")),
		Some(timeout_secs) => Some(Duration::from_secs(timeout_secs)),
		None => defaults.timeout,
	};
	Ok(ClientOptions { base_url, timeout })
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_layering() {
		let options = client_options(Config::default(), None, None).unwrap();
		assert_eq!(options.base_url, "http://localhost:8000");
		assert_eq!(options.timeout, None);

		let config = Config::from_slice(br#"{ "url": "http://rice:9000", "timeout_secs": 30 }"#)
			.unwrap();
		let options = client_options(config, None, Some(5)).unwrap();
		assert_eq!(options.base_url, "http://rice:9000");
		assert_eq!(options.timeout, Some(Duration::from_secs(5)));

		let config = Config::from_slice(br#"{ "url": "http://rice:9000" }"#).unwrap();
		let options = client_options(config, Some("http://other".to_owned()), None).unwrap();
		assert_eq!(options.base_url, "http://other");
		assert_eq!(options.timeout, None);
	}

	#[test]
	fn test_invalid() {
		assert!(Config::from_slice(br#"{ "uri": "http://rice:9000" }"#).is_err());
		assert!(Config::from_slice(br#"{ "timeout_secs": -1 }"#).is_err());
		assert!(client_options(Config::default(), None, Some(0)).is_err());
		let error = Config::from_path(Path::new("/nonexistent/rice.json")).unwrap_err();
		assert_eq!(
			error.to_string(),
			"failed to read config file /nonexistent/rice.json"
		);
	}
}
