/*!
This crate computes classification metrics from a confusion matrix: per class precision, recall and f1 score with [`compute_class_metrics`](fn.compute_class_metrics.html), and whole model summaries with [`ClassificationSummary`](struct.ClassificationSummary.html).

Every metric here is a pure function of its input. A ratio whose denominator is zero is reported as 0 rather than NaN.
*/

#![allow(clippy::tabs_in_doc_comments)]

mod class_metrics;
mod confusion_matrix;
mod summary;

pub use self::class_metrics::{compute_class_metrics, ClassMetrics, ClassMetricsDisplay};
pub use self::confusion_matrix::{ConfusionMatrix, MetricsError};
pub use self::summary::ClassificationSummary;

/**
The `Metric` trait defines a common interface to metrics that can be computed when the entire input is available at once.

The seemingly unused generic lifetime `'a` exists here to allow `Input`s and `Output`s to borrow from their enclosing scope.
*/
pub trait Metric<'a> {
	type Input;
	type Output;
	fn compute(input: Self::Input) -> Self::Output;
}

/// Divide, reporting 0 when the denominator is 0.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
	if denominator == 0.0 {
		0.0
	} else {
		numerator / denominator
	}
}
