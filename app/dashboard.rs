use crate::{Error, MetricsTab, PredictTab, ProjectionTab};
use parking_lot::Mutex;
use rice_client::Client;
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
	Prediction,
	Projection,
	Metrics,
}

impl Tab {
	pub const ALL: [Tab; 3] = [Tab::Prediction, Tab::Projection, Tab::Metrics];

	pub fn as_str(self) -> &'static str {
		match self {
			Tab::Prediction => "prediction",
			Tab::Projection => "projection",
			Tab::Metrics => "metrics",
		}
	}
}

impl Default for Tab {
	fn default() -> Tab {
		Tab::Prediction
	}
}

impl fmt::Display for Tab {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Tab {
	type Err = Error;
	fn from_str(s: &str) -> Result<Tab, Error> {
		Tab::ALL
			.iter()
			.copied()
			.find(|tab| tab.as_str() == s)
			.ok_or_else(|| Error::InvalidTab(s.to_owned()))
	}
}

/// The three tabs, sharing one client.
pub struct Dashboard {
	active: Mutex<Tab>,
	pub predict: PredictTab,
	pub projection: ProjectionTab,
	pub metrics: MetricsTab,
}

impl Dashboard {
	pub fn new(client: Client) -> Dashboard {
		Dashboard {
			active: Mutex::new(Tab::default()),
			predict: PredictTab::new(client.clone()),
			projection: ProjectionTab::new(client.clone()),
			metrics: MetricsTab::new(client),
		}
	}

	pub fn active(&self) -> Tab {
		*self.active.lock()
	}

	/// Switch tabs. Each tab keeps its own state across switches.
	pub fn select(&self, tab: Tab) {
		*self.active.lock() = tab;
	}

	/// Whether the active tab has a request in flight.
	pub fn is_loading(&self) -> bool {
		match self.active() {
			Tab::Prediction => self.predict.is_loading(),
			Tab::Projection => self.projection.is_loading(),
			Tab::Metrics => self.metrics.is_loading(),
		}
	}
}

#[test]
fn test_tabs() {
	let dashboard = Dashboard::new(Client::new(Default::default()).unwrap());
	assert_eq!(dashboard.active(), Tab::Prediction);
	dashboard.select("metrics".parse().unwrap());
	assert_eq!(dashboard.active(), Tab::Metrics);
	assert!(!dashboard.is_loading());
	let error = "charts".parse::<Tab>().unwrap_err();
	assert!(matches!(error, Error::InvalidTab(ref tab) if tab == "charts"));
	assert_eq!(
		error.to_string(),
		"unknown tab \"charts\", expected one of prediction, projection, metrics"
	);
	assert_eq!(dashboard.metrics.model(), rice_client::ModelName::Knn);
	assert_eq!(
		dashboard.projection.method(),
		rice_client::ProjectionMethod::Pca
	);
}
