use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Client(#[from] rice_client::Error),
	#[error(transparent)]
	Metrics(#[from] rice_metrics::MetricsError),
	#[error("unknown tab {0:?}, expected one of prediction, projection, metrics")]
	InvalidTab(String),
}
