//! Plain text rendering of the dashboard tabs.

use rice_app::{MetricsReport, Prediction, Projection};
use rice_client::{FeatureGroups, FeatureVector};
use rice_util::{
	format::{format_fixed, format_percent},
	table::Table,
};

pub fn feature_groups(groups: &FeatureGroups) -> String {
	let mut table = Table::new(vec!["Group", "Features"]);
	for group in groups.iter() {
		table.push_row(vec![group.name.clone(), group.features.join(", ")]);
	}
	table.to_string()
}

pub fn feature_values(features: &FeatureVector) -> String {
	let mut table = Table::new(vec!["Feature", "Value"]);
	for (name, value) in features {
		table.push_row(vec![name.clone(), format_fixed(*value, 4)]);
	}
	table.to_string()
}

pub fn prediction(prediction: &Prediction) -> String {
	let mut output = String::new();
	for (i, (model_name, result)) in prediction.iter().enumerate() {
		if i > 0 {
			output.push('\n');
		}
		output.push_str(&format!(
			"{}: {} ({})\n",
			model_name.label(),
			result.predicted_class,
			format_percent(result.confidence()),
		));
		let mut table = Table::new(vec!["Class", "Probability"]);
		for (class, probability) in result.ranked_probabilities() {
			table.push_row(vec![class.to_owned(), format_percent(probability)]);
		}
		output.push_str(&table.to_string());
	}
	output
}

/// Render the class distribution and at most `limit` points.
pub fn projection(projection: &Projection, limit: usize) -> String {
	let mut output = format!(
		"{} projection of {} points\n",
		projection.method.label(),
		projection.points.len()
	);
	if projection.points.is_empty() {
		return output;
	}
	let mut distribution = Table::new(vec!["Class", "Count", "Share"]);
	for share in projection.distribution.iter() {
		distribution.push_row(vec![
			share.label.clone(),
			share.count.to_string(),
			share.percent(),
		]);
	}
	output.push('\n');
	output.push_str(&distribution.to_string());
	let mut points = Table::new(vec!["X", "Y", "Label"]);
	for point in projection.points.iter().take(limit) {
		points.push_row(vec![
			format_fixed(point.x, 3),
			format_fixed(point.y, 3),
			point.label.clone(),
		]);
	}
	if !points.is_empty() {
		output.push('\n');
		output.push_str(&points.to_string());
	}
	output
}

pub fn metrics(report: &MetricsReport) -> String {
	let mut output = format!(
		"{}\nAccuracy: {}\n\n",
		report.model.label(),
		report.accuracy_percent()
	);
	let mut classes = Table::new(vec!["Class", "Precision", "Recall", "F1 Score"]);
	for class_metrics in report.class_metrics.iter() {
		let display = class_metrics.display();
		classes.push_row(vec![
			display.label,
			display.precision,
			display.recall,
			display.f1_score,
		]);
	}
	output.push_str(&classes.to_string());
	let summary = &report.summary;
	let mut averages = Table::new(vec!["Average", "Precision", "Recall", "F1 Score"]);
	averages.push_row(vec![
		"Unweighted".to_owned(),
		format_fixed(summary.precision_unweighted, 3),
		format_fixed(summary.recall_unweighted, 3),
		format_fixed(summary.f1_score_unweighted, 3),
	]);
	averages.push_row(vec![
		"Weighted".to_owned(),
		format_fixed(summary.precision_weighted, 3),
		format_fixed(summary.recall_weighted, 3),
	]);
	output.push('\n');
	output.push_str(&averages.to_string());
	let labels = &report.metrics.labels;
	let mut header = vec!["Actual \\ Predicted".to_owned()];
	header.extend(labels.iter().cloned());
	let mut confusion_matrix = Table::new(header);
	for (label, counts) in labels
		.iter()
		.zip(report.metrics.confusion_matrix.to_rows())
	{
		let mut row = vec![label.clone()];
		row.extend(counts.iter().map(|count| count.to_string()));
		confusion_matrix.push_row(row);
	}
	output.push('\n');
	output.push_str(&confusion_matrix.to_string());
	output
}

#[cfg(test)]
mod test {
	use super::*;
	use rice_app::{class_distribution, MetricsReport};
	use rice_client::{
		FeatureGroup, ModelName, PredictionResult, ProjectionMethod, ProjectionPoint,
	};

	fn lines(output: &str) -> Vec<&str> {
		output.lines().collect()
	}

	#[test]
	fn test_feature_groups() {
		let groups = FeatureGroups::new(vec![
			FeatureGroup {
				name: "Shape".to_owned(),
				features: vec!["SHAPEFACTOR_1".to_owned(), "SHAPEFACTOR_2".to_owned()],
			},
			FeatureGroup {
				name: "Color".to_owned(),
				features: vec!["MEAN_RR".to_owned()],
			},
		]);
		insta::assert_debug_snapshot!(lines(&feature_groups(&groups)), @r###"
  [
      "| Group | Features                     |",
      "|-------|------------------------------|",
      "| Shape | SHAPEFACTOR_1, SHAPEFACTOR_2 |",
      "| Color | MEAN_RR                      |",
  ]
  "###);
	}

	#[test]
	fn test_prediction() {
		let result = PredictionResult {
			predicted_class: "Jasmine".to_owned(),
			probabilities: vec![("Basmati".to_owned(), 0.25), ("Jasmine".to_owned(), 0.75)]
				.into_iter()
				.collect(),
		};
		let output = prediction(&Prediction::Single(ModelName::Svm, result));
		insta::assert_debug_snapshot!(lines(&output), @r###"
  [
      "Support Vector Machine: Jasmine (75.00%)",
      "| Class   | Probability |",
      "|---------|-------------|",
      "| Jasmine | 75.00%      |",
      "| Basmati | 25.00%      |",
  ]
  "###);
	}

	#[test]
	fn test_projection() {
		let point = |x, y, label: &str| ProjectionPoint {
			x,
			y,
			label: label.to_owned(),
		};
		let points = vec![
			point(0.1, -2.0, "Jasmine"),
			point(1.25, 0.3333, "Basmati"),
			point(3.0, 4.0, "Jasmine"),
		];
		let projection = Projection {
			method: ProjectionMethod::Pca,
			distribution: class_distribution(&points),
			points,
		};
		insta::assert_debug_snapshot!(lines(&super::projection(&projection, 2)), @r###"
  [
      "PCA projection of 3 points",
      "",
      "| Class   | Count | Share |",
      "|---------|-------|-------|",
      "| Basmati | 1     | 33.3% |",
      "| Jasmine | 2     | 66.7% |",
      "",
      "| X     | Y      | Label   |",
      "|-------|--------|---------|",
      "| 0.100 | -2.000 | Jasmine |",
      "| 1.250 | 0.333  | Basmati |",
  ]
  "###);
		let empty = Projection {
			method: ProjectionMethod::Tsne,
			points: Vec::new(),
			distribution: Vec::new(),
		};
		assert_eq!(super::projection(&empty, 10), "t-SNE projection of 0 points\n");
	}

	#[test]
	fn test_metrics() {
		let metrics = serde_json::from_str(
			r#"{"accuracy":0.85,"confusion_matrix":[[8,2],[1,9]],"labels":["Jasmine","Basmati"]}"#,
		)
		.unwrap();
		let report = MetricsReport::new(ModelName::Knn, metrics).unwrap();
		insta::assert_debug_snapshot!(lines(&super::metrics(&report)), @r###"
  [
      "K-Nearest Neighbors",
      "Accuracy: 85.00%",
      "",
      "| Class   | Precision | Recall | F1 Score |",
      "|---------|-----------|--------|----------|",
      "| Jasmine | 0.889     | 0.800  | 0.842    |",
      "| Basmati | 0.818     | 0.900  | 0.857    |",
      "",
      "| Average    | Precision | Recall | F1 Score |",
      "|------------|-----------|--------|----------|",
      "| Unweighted | 0.854     | 0.850  | 0.850    |",
      "| Weighted   | 0.854     | 0.850  |          |",
      "",
      "| Actual \\ Predicted | Jasmine | Basmati |",
      "|--------------------|---------|---------|",
      "| Jasmine            | 8       | 2       |",
      "| Basmati            | 1       | 9       |",
  ]
  "###);
	}
}
