use crate::{Error, Slot, TabState};
use parking_lot::Mutex;
use rice_client::{Client, MetricsResult, ModelName};
use rice_metrics::{ClassMetrics, ClassificationSummary, Metric};
use rice_util::format::format_percent;

/// A model's metrics as fetched from the service together with the metrics derived from its confusion matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricsReport {
	pub model: ModelName,
	pub metrics: MetricsResult,
	pub class_metrics: Vec<ClassMetrics>,
	pub summary: ClassificationSummary,
}

impl MetricsReport {
	pub fn new(model: ModelName, metrics: MetricsResult) -> Result<MetricsReport, Error> {
		let class_metrics = metrics.class_metrics()?;
		let summary = ClassificationSummary::compute(&metrics.confusion_matrix);
		Ok(MetricsReport {
			model,
			metrics,
			class_metrics,
			summary,
		})
	}

	/// The accuracy reported by the service, as a percentage.
	pub fn accuracy_percent(&self) -> String {
		format_percent(self.metrics.accuracy)
	}
}

pub struct MetricsTab {
	client: Client,
	model: Mutex<ModelName>,
	result: Slot<MetricsReport>,
}

impl MetricsTab {
	pub fn new(client: Client) -> MetricsTab {
		MetricsTab {
			client,
			model: Mutex::new(ModelName::default()),
			result: Slot::new(),
		}
	}

	pub fn model(&self) -> ModelName {
		*self.model.lock()
	}

	pub fn select(&self, model: ModelName) {
		*self.model.lock() = model;
	}

	/// Fetch the metrics of the selected model.
	pub async fn fetch(&self) -> bool {
		let model = self.model();
		let client = &self.client;
		self.result
			.run(async move {
				let metrics = client.fetch_metrics(model).await?;
				MetricsReport::new(model, metrics)
			})
			.await
	}

	/// Select `model` and fetch its metrics.
	pub async fn fetch_model(&self, model: ModelName) -> bool {
		self.select(model);
		self.fetch().await
	}

	pub fn state(&self) -> TabState<MetricsReport> {
		self.result.state()
	}

	pub fn is_loading(&self) -> bool {
		self.result.is_loading()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test::{MockService, Route};
	use std::{sync::Arc, time::Duration};

	const KNN: &str = r#"{"accuracy":0.95,"confusion_matrix":[[50,2],[3,45]],"labels":["Jasmine","Basmati"]}"#;
	const SVM: &str = r#"{"accuracy":1.0,"confusion_matrix":[[10,0],[0,10]],"labels":["Jasmine","Basmati"]}"#;

	#[tokio::test]
	async fn test_fetch() {
		let service = MockService::start(vec![Route::new("/metrics/knn", 200, KNN)]);
		let tab = MetricsTab::new(service.client());
		assert!(tab.fetch().await);
		let state = tab.state();
		let report = state.data().unwrap();
		assert_eq!(report.model, ModelName::Knn);
		assert_eq!(report.accuracy_percent(), "95.00%");
		let display: Vec<_> = report.class_metrics.iter().map(|c| c.display()).collect();
		assert_eq!(display[0].label, "Jasmine");
		assert_eq!(display[0].precision, "0.943");
		assert_eq!(display[0].recall, "0.962");
		assert_eq!(display[0].f1_score, "0.952");
		assert!((report.summary.accuracy - 0.95).abs() < 1e-12);
	}

	#[tokio::test]
	async fn test_fetch_failure() {
		let service = MockService::start(vec![]);
		let tab = MetricsTab::new(service.client());
		assert!(tab.fetch_model(ModelName::Nb).await);
		assert_eq!(tab.state().error(), Some("Failed to fetch metrics data"));
		assert_eq!(service.requests()[0].path_and_query, "/metrics/nb");
	}

	#[tokio::test]
	async fn test_fetch_counts_too_large() {
		let body = r#"{"accuracy":0.5,"confusion_matrix":[[18446744073709551615,1],[1,1]],"labels":["Jasmine","Basmati"]}"#;
		let service = MockService::start(vec![Route::new("/metrics/knn", 200, body)]);
		let tab = MetricsTab::new(service.client());
		assert!(tab.fetch().await);
		assert_eq!(tab.state().error(), Some("Invalid response shape"));
	}

	#[tokio::test]
	async fn test_slow_response_does_not_overwrite_newer_one() {
		let service = MockService::start(vec![
			Route::new("/metrics/knn", 200, KNN).delayed(Duration::from_millis(500)),
			Route::new("/metrics/svm", 200, SVM),
		]);
		let tab = Arc::new(MetricsTab::new(service.client()));
		let slow = tokio::spawn({
			let tab = tab.clone();
			async move { tab.fetch_model(ModelName::Knn).await }
		});
		// Wait for the slow request to reach the service before starting the next one.
		while service.requests().is_empty() {
			tokio::time::sleep(Duration::from_millis(10)).await;
		}
		assert!(tab.is_loading());
		assert!(tab.fetch_model(ModelName::Svm).await);
		assert!(!slow.await.unwrap());
		let state = tab.state();
		assert_eq!(state.data().unwrap().model, ModelName::Svm);
		assert_eq!(state.data().unwrap().summary.accuracy, 1.0);
	}
}
