use crate::{class_metrics::class_metrics, ratio, ConfusionMatrix, Metric};
use ndarray::prelude::*;

/// Whole model metrics derived from a confusion matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassificationSummary {
	pub n_examples: u64,
	/// The fraction of examples on the diagonal.
	pub accuracy: f64,
	pub precision_unweighted: f64,
	pub recall_unweighted: f64,
	pub f1_score_unweighted: f64,
	/// Per class precision weighted by the number of examples whose actual class it is.
	pub precision_weighted: f64,
	pub recall_weighted: f64,
}

impl<'a> Metric<'a> for ClassificationSummary {
	type Input = &'a ConfusionMatrix;
	type Output = ClassificationSummary;

	fn compute(confusion_matrix: &ConfusionMatrix) -> ClassificationSummary {
		let counts = confusion_matrix.view();
		let n_classes = confusion_matrix.n_classes();
		let n_examples = confusion_matrix.n_examples();
		// A ConfusionMatrix is square and its total fits in a u64. The summary does not need labels.
		let class_metrics: Vec<_> = (0..n_classes)
			.map(|class_index| class_metrics(counts, class_index, ""))
			.collect();
		let n_correct: u64 = counts.diag().sum();
		let accuracy = ratio(n_correct as f64, n_examples as f64);
		let mean = |value: fn(&crate::ClassMetrics) -> f64| {
			ratio(
				class_metrics.iter().map(value).sum::<f64>(),
				class_metrics.len() as f64,
			)
		};
		let precision_unweighted = mean(|class| class.precision);
		let recall_unweighted = mean(|class| class.recall);
		let f1_score_unweighted = mean(|class| class.f1_score);
		let n_examples_per_class = counts.sum_axis(Axis(1));
		let weighted = |value: fn(&crate::ClassMetrics) -> f64| {
			ratio(
				class_metrics
					.iter()
					.zip(n_examples_per_class.iter())
					.map(|(class, &n_examples_in_class)| value(class) * n_examples_in_class as f64)
					.sum::<f64>(),
				n_examples as f64,
			)
		};
		let precision_weighted = weighted(|class| class.precision);
		let recall_weighted = weighted(|class| class.recall);
		ClassificationSummary {
			n_examples,
			accuracy,
			precision_unweighted,
			recall_unweighted,
			f1_score_unweighted,
			precision_weighted,
			recall_weighted,
		}
	}
}

#[test]
fn test_summary() {
	let confusion_matrix = ConfusionMatrix::new(arr2(&[[50, 2], [3, 45]])).unwrap();
	let summary = ClassificationSummary::compute(&confusion_matrix);
	assert_eq!(summary.n_examples, 100);
	assert!((summary.accuracy - 0.95).abs() < 1e-12);
	let precision_unweighted = (50.0 / 53.0 + 45.0 / 47.0) / 2.0;
	assert!((summary.precision_unweighted - precision_unweighted).abs() < 1e-12);
	let recall_weighted = (50.0 / 52.0 * 52.0 + 45.0 / 48.0 * 48.0) / 100.0;
	assert!((summary.recall_weighted - recall_weighted).abs() < 1e-12);
	assert!((summary.recall_weighted - summary.accuracy).abs() < 1e-12);
}

#[test]
fn test_summary_near_count_limit() {
	let confusion_matrix =
		ConfusionMatrix::new(arr2(&[[u64::MAX - 2, 1], [1, 0]])).unwrap();
	let summary = ClassificationSummary::compute(&confusion_matrix);
	assert_eq!(summary.n_examples, u64::MAX);
	assert!(summary.accuracy > 0.999);
	assert!(summary.precision_weighted <= 1.0);
}

#[test]
fn test_summary_zero_matrix() {
	let confusion_matrix = ConfusionMatrix::new(Array2::zeros((3, 3))).unwrap();
	insta::assert_debug_snapshot!(ClassificationSummary::compute(&confusion_matrix), @r###"
 ClassificationSummary {
     n_examples: 0,
     accuracy: 0.0,
     precision_unweighted: 0.0,
     recall_unweighted: 0.0,
     f1_score_unweighted: 0.0,
     precision_weighted: 0.0,
     recall_weighted: 0.0,
 }
 "###);
}
