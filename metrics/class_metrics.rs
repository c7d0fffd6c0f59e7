use crate::{confusion_matrix::check_counts, ratio, MetricsError};
use ndarray::prelude::*;

/// Precision, recall and f1 score for one class, treating every other class as negative.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassMetrics {
	pub label: String,
	pub true_positives: u64,
	pub false_positives: u64,
	pub false_negatives: u64,
	pub precision: f64,
	pub recall: f64,
	pub f1_score: f64,
}

/// [`ClassMetrics`](struct.ClassMetrics.html) rounded to 3 decimal places for display.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ClassMetricsDisplay {
	pub label: String,
	pub precision: String,
	pub recall: String,
	pub f1_score: String,
}

impl ClassMetrics {
	pub fn display(&self) -> ClassMetricsDisplay {
		ClassMetricsDisplay {
			label: self.label.clone(),
			precision: format!("{:.3}", self.precision),
			recall: format!("{:.3}", self.recall),
			f1_score: format!("{:.3}", self.f1_score),
		}
	}
}

/**
Compute precision, recall and f1 score for each class of a confusion matrix, in label order.

Rows of `confusion_matrix` are actual classes and columns are predicted classes, so for class `i` the false positives are column `i` without the diagonal and the false negatives are row `i` without the diagonal. The matrix must be square with one row per label, and its counts must add up to at most `u64::MAX`.

```
use ndarray::prelude::*;
use rice_metrics::compute_class_metrics;

let confusion_matrix = arr2(&[[50, 2], [3, 45]]);
let class_metrics = compute_class_metrics(confusion_matrix.view(), &["Jasmine", "Basmati"]).unwrap();
assert_eq!(class_metrics[0].display().precision, "0.943");
```
*/
pub fn compute_class_metrics<S>(
	confusion_matrix: ArrayView2<u64>,
	labels: &[S],
) -> Result<Vec<ClassMetrics>, MetricsError>
where
	S: AsRef<str>,
{
	check_counts(confusion_matrix)?;
	let n_classes = confusion_matrix.nrows();
	if labels.len() != n_classes {
		return Err(MetricsError::LabelCountMismatch {
			n_classes,
			n_labels: labels.len(),
		});
	}
	Ok(labels
		.iter()
		.enumerate()
		.map(|(class_index, label)| class_metrics(confusion_matrix, class_index, label.as_ref()))
		.collect())
}

/// The metrics of one class of a matrix that passed `check_counts`.
pub(crate) fn class_metrics(
	confusion_matrix: ArrayView2<u64>,
	class_index: usize,
	label: &str,
) -> ClassMetrics {
	let true_positives = confusion_matrix[(class_index, class_index)];
	let false_positives = confusion_matrix.column(class_index).sum() - true_positives;
	let false_negatives = confusion_matrix.row(class_index).sum() - true_positives;
	let precision = ratio(
		true_positives as f64,
		(true_positives + false_positives) as f64,
	);
	let recall = ratio(
		true_positives as f64,
		(true_positives + false_negatives) as f64,
	);
	let f1_score = ratio(2.0 * precision * recall, precision + recall);
	ClassMetrics {
		label: label.to_owned(),
		true_positives,
		false_positives,
		false_negatives,
		precision,
		recall,
		f1_score,
	}
}

#[test]
fn test_two_classes() {
	let confusion_matrix = arr2(&[[50, 2], [3, 45]]);
	let class_metrics =
		compute_class_metrics(confusion_matrix.view(), &["Jasmine", "Basmati"]).unwrap();
	let jasmine = &class_metrics[0];
	assert_eq!(jasmine.true_positives, 50);
	assert_eq!(jasmine.false_positives, 3);
	assert_eq!(jasmine.false_negatives, 2);
	assert!((jasmine.precision - 50.0 / 53.0).abs() < 1e-12);
	assert!((jasmine.recall - 50.0 / 52.0).abs() < 1e-12);
	let display = jasmine.display();
	assert_eq!(display.precision, "0.943");
	assert_eq!(display.recall, "0.962");
	assert_eq!(display.f1_score, "0.952");
	let basmati = &class_metrics[1];
	assert_eq!(basmati.false_positives, 2);
	assert_eq!(basmati.false_negatives, 3);
	assert!((basmati.precision - 45.0 / 47.0).abs() < 1e-12);
	assert!((basmati.recall - 45.0 / 48.0).abs() < 1e-12);
	assert_eq!(basmati.display().f1_score, "0.947");
}

#[test]
fn test_multiclass() {
	// example taken from https://en.wikipedia.org/wiki/Confusion_matrix
	let confusion_matrix = arr2(&[[5, 3, 0], [2, 3, 1], [0, 2, 11]]);
	let labels = ["Cat", "Dog", "Rabbit"];
	let class_metrics = compute_class_metrics(confusion_matrix.view(), &labels).unwrap();
	assert_eq!(class_metrics.len(), 3);
	for class in class_metrics.iter() {
		for value in &[class.precision, class.recall, class.f1_score] {
			assert!((0.0..=1.0).contains(value));
		}
	}
	let labels: Vec<_> = class_metrics.iter().map(|c| c.label.as_str()).collect();
	assert_eq!(labels, vec!["Cat", "Dog", "Rabbit"]);
	assert!((class_metrics[1].precision - 3.0 / 8.0).abs() < 1e-12);
	assert!((class_metrics[1].recall - 3.0 / 6.0).abs() < 1e-12);
}

#[test]
fn test_diagonal() {
	let confusion_matrix = arr2(&[[7, 0, 0], [0, 1, 0], [0, 0, 42]]);
	let class_metrics =
		compute_class_metrics(confusion_matrix.view(), &["Arborio", "Ipsala", "Karacadag"])
			.unwrap();
	let display: Vec<_> = class_metrics.iter().map(|c| c.display()).collect();
	insta::assert_debug_snapshot!(display, @r###"
 [
     ClassMetricsDisplay {
         label: "Arborio",
         precision: "1.000",
         recall: "1.000",
         f1_score: "1.000",
     },
     ClassMetricsDisplay {
         label: "Ipsala",
         precision: "1.000",
         recall: "1.000",
         f1_score: "1.000",
     },
     ClassMetricsDisplay {
         label: "Karacadag",
         precision: "1.000",
         recall: "1.000",
         f1_score: "1.000",
     },
 ]
 "###);
}

#[test]
fn test_zero_matrix() {
	let confusion_matrix = Array2::<u64>::zeros((2, 2));
	let class_metrics =
		compute_class_metrics(confusion_matrix.view(), &["Jasmine", "Basmati"]).unwrap();
	insta::assert_debug_snapshot!(class_metrics[0], @r###"
 ClassMetrics {
     label: "Jasmine",
     true_positives: 0,
     false_positives: 0,
     false_negatives: 0,
     precision: 0.0,
     recall: 0.0,
     f1_score: 0.0,
 }
 "###);
	assert!(class_metrics
		.iter()
		.all(|c| c.precision == 0.0 && c.recall == 0.0 && c.f1_score == 0.0));
}

#[test]
fn test_invalid_input() {
	let confusion_matrix = arr2(&[[1, 2, 3], [4, 5, 6]]);
	assert_eq!(
		compute_class_metrics(confusion_matrix.view(), &["a", "b"]),
		Err(MetricsError::NotSquare {
			n_rows: 2,
			n_columns: 3
		})
	);
	let confusion_matrix = arr2(&[[1, 2], [3, 4]]);
	assert_eq!(
		compute_class_metrics(confusion_matrix.view(), &["a", "b", "c"]),
		Err(MetricsError::LabelCountMismatch {
			n_classes: 2,
			n_labels: 3
		})
	);
	let empty: [&str; 0] = [];
	assert_eq!(
		compute_class_metrics(Array2::<u64>::zeros((0, 0)).view(), &empty),
		Ok(Vec::new())
	);
}

#[test]
fn test_count_overflow() {
	let confusion_matrix = arr2(&[[u64::MAX, 1], [1, 1]]);
	assert_eq!(
		compute_class_metrics(confusion_matrix.view(), &["Jasmine", "Basmati"]),
		Err(MetricsError::CountOverflow)
	);
}
