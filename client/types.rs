use crate::Error;
use rice_metrics::{compute_class_metrics, ClassMetrics, ConfusionMatrix, MetricsError};
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Feature values keyed by feature name.
pub type FeatureVector = BTreeMap<String, f64>;

/// The models the service can predict with.
#[derive(
	Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum ModelName {
	#[serde(rename = "knn")]
	Knn,
	#[serde(rename = "svm")]
	Svm,
	#[serde(rename = "nb")]
	Nb,
}

impl ModelName {
	pub const ALL: [ModelName; 3] = [ModelName::Knn, ModelName::Svm, ModelName::Nb];

	pub fn as_str(self) -> &'static str {
		match self {
			ModelName::Knn => "knn",
			ModelName::Svm => "svm",
			ModelName::Nb => "nb",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			ModelName::Knn => "K-Nearest Neighbors",
			ModelName::Svm => "Support Vector Machine",
			ModelName::Nb => "Naive Bayes",
		}
	}
}

impl Default for ModelName {
	fn default() -> ModelName {
		ModelName::Knn
	}
}

impl fmt::Display for ModelName {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ModelName {
	type Err = Error;
	fn from_str(s: &str) -> Result<ModelName, Error> {
		ModelName::ALL
			.iter()
			.copied()
			.find(|model_name| model_name.as_str() == s)
			.ok_or_else(|| {
				Error::InvalidInput(format!(
					"unknown model {:?}, expected one of knn, svm, nb",
					s
				))
			})
	}
}

/// The dimensionality reduction used to place every sample of the dataset in 2D.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProjectionMethod {
	#[serde(rename = "pca")]
	Pca,
	#[serde(rename = "tsne")]
	Tsne,
}

impl ProjectionMethod {
	pub const ALL: [ProjectionMethod; 2] = [ProjectionMethod::Pca, ProjectionMethod::Tsne];

	pub fn as_str(self) -> &'static str {
		match self {
			ProjectionMethod::Pca => "pca",
			ProjectionMethod::Tsne => "tsne",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			ProjectionMethod::Pca => "PCA",
			ProjectionMethod::Tsne => "t-SNE",
		}
	}
}

impl Default for ProjectionMethod {
	fn default() -> ProjectionMethod {
		ProjectionMethod::Pca
	}
}

impl fmt::Display for ProjectionMethod {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ProjectionMethod {
	type Err = Error;
	fn from_str(s: &str) -> Result<ProjectionMethod, Error> {
		ProjectionMethod::ALL
			.iter()
			.copied()
			.find(|method| method.as_str() == s)
			.ok_or_else(|| {
				Error::InvalidInput(format!(
					"unknown projection method {:?}, expected pca or tsne",
					s
				))
			})
	}
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PredictionResult {
	pub predicted_class: String,
	/// Probabilities are shown as the service returns them. They are not required to sum to 1.
	pub probabilities: BTreeMap<String, f64>,
}

impl PredictionResult {
	/// The highest class probability, or 0 if there are none.
	pub fn confidence(&self) -> f64 {
		self.probabilities.values().copied().fold(0.0, f64::max)
	}

	/// Class probabilities from most to least likely.
	pub fn ranked_probabilities(&self) -> Vec<(&str, f64)> {
		let mut probabilities: Vec<(&str, f64)> = self
			.probabilities
			.iter()
			.map(|(class, probability)| (class.as_str(), *probability))
			.collect();
		probabilities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
		probabilities
	}
}

/// One prediction per model.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PredictAllResult {
	pub knn: PredictionResult,
	pub svm: PredictionResult,
	pub nb: PredictionResult,
}

impl PredictAllResult {
	pub fn get(&self, model_name: ModelName) -> &PredictionResult {
		match model_name {
			ModelName::Knn => &self.knn,
			ModelName::Svm => &self.svm,
			ModelName::Nb => &self.nb,
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = (ModelName, &PredictionResult)> {
		ModelName::ALL
			.iter()
			.map(move |model_name| (*model_name, self.get(*model_name)))
	}
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ProjectionPoint {
	pub x: f64,
	pub y: f64,
	pub label: String,
}

/// Evaluation metrics for one model on the test set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricsResult {
	pub accuracy: f64,
	pub confusion_matrix: ConfusionMatrix,
	/// Class names in confusion matrix order.
	pub labels: Vec<String>,
}

impl MetricsResult {
	/// Check the invariants serde cannot: one label per confusion matrix class and an accuracy in [0, 1].
	pub fn validate(&self) -> Result<(), Error> {
		let n_classes = self.confusion_matrix.n_classes();
		if self.labels.len() != n_classes {
			return Err(Error::invalid_response(MetricsError::LabelCountMismatch {
				n_classes,
				n_labels: self.labels.len(),
			}));
		}
		if !(0.0..=1.0).contains(&self.accuracy) {
			return Err(Error::invalid_response(format!(
				"accuracy {} is outside [0, 1]",
				self.accuracy
			)));
		}
		Ok(())
	}

	pub fn class_metrics(&self) -> Result<Vec<ClassMetrics>, MetricsError> {
		compute_class_metrics(self.confusion_matrix.view(), &self.labels)
	}
}

#[test]
fn test_model_name() {
	assert_eq!("svm".parse::<ModelName>().unwrap(), ModelName::Svm);
	assert_eq!(ModelName::Nb.to_string(), "nb");
	assert_eq!(ModelName::Knn.label(), "K-Nearest Neighbors");
	let error = "lr".parse::<ModelName>().unwrap_err();
	assert_eq!(
		error.to_string(),
		"invalid input: unknown model \"lr\", expected one of knn, svm, nb"
	);
	assert_eq!(
		serde_json::to_string(&ModelName::Knn).unwrap(),
		"\"knn\""
	);
}

#[test]
fn test_projection_method() {
	assert_eq!("tsne".parse::<ProjectionMethod>().unwrap(), ProjectionMethod::Tsne);
	assert_eq!(ProjectionMethod::default(), ProjectionMethod::Pca);
	assert!("umap".parse::<ProjectionMethod>().is_err());
}

#[test]
fn test_prediction_result() {
	let result: PredictionResult = serde_json::from_str(
		r#"{"predicted_class":"Jasmine","probabilities":{"Basmati":0.25,"Jasmine":0.7,"Arborio":0.05}}"#,
	)
	.unwrap();
	assert_eq!(result.confidence(), 0.7);
	assert_eq!(
		result.ranked_probabilities(),
		vec![("Jasmine", 0.7), ("Basmati", 0.25), ("Arborio", 0.05)]
	);
	let empty = PredictionResult {
		predicted_class: "Jasmine".to_owned(),
		probabilities: BTreeMap::new(),
	};
	assert_eq!(empty.confidence(), 0.0);
}

#[test]
fn test_metrics_result_validate() {
	let metrics: MetricsResult = serde_json::from_str(
		r#"{"accuracy":0.95,"confusion_matrix":[[50,2],[3,45]],"labels":["Jasmine","Basmati"]}"#,
	)
	.unwrap();
	assert!(metrics.validate().is_ok());
	assert_eq!(metrics.class_metrics().unwrap().len(), 2);
	let metrics: MetricsResult = serde_json::from_str(
		r#"{"accuracy":0.95,"confusion_matrix":[[50,2],[3,45]],"labels":["Jasmine"]}"#,
	)
	.unwrap();
	assert_eq!(metrics.validate().unwrap_err().to_string(), "Invalid response shape");
	let metrics: MetricsResult = serde_json::from_str(
		r#"{"accuracy":1.5,"confusion_matrix":[[1]],"labels":["Jasmine"]}"#,
	)
	.unwrap();
	assert!(metrics.validate().is_err());
}
