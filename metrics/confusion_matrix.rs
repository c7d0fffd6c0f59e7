use ndarray::prelude::*;
use std::convert::TryFrom;
use thiserror::Error;

/// The input to a metric was not a valid confusion matrix for the given labels.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MetricsError {
	#[error("confusion matrix row {row} has {len} entries, expected {expected}")]
	RaggedRow {
		row: usize,
		len: usize,
		expected: usize,
	},
	#[error("confusion matrix must be square, got {n_rows}x{n_columns}")]
	NotSquare { n_rows: usize, n_columns: usize },
	#[error("confusion matrix has {n_classes} classes but {n_labels} labels were given")]
	LabelCountMismatch { n_classes: usize, n_labels: usize },
	#[error("confusion matrix counts add up to more than {}", u64::MAX)]
	CountOverflow,
}

/// A square matrix of counts where entry `(i, j)` is the number of examples of actual class `i` that were predicted as class `j`.
///
/// It serializes as an array of rows. The total of all counts fits in a `u64`, so no row, column or diagonal sum can overflow.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Vec<u64>>", into = "Vec<Vec<u64>>")]
pub struct ConfusionMatrix(Array2<u64>);

impl ConfusionMatrix {
	pub fn new(counts: Array2<u64>) -> Result<ConfusionMatrix, MetricsError> {
		check_counts(counts.view())?;
		Ok(ConfusionMatrix(counts))
	}

	pub fn from_rows(rows: Vec<Vec<u64>>) -> Result<ConfusionMatrix, MetricsError> {
		let n_rows = rows.len();
		let n_columns = rows.first().map(|row| row.len()).unwrap_or(0);
		if let Some((row, values)) = rows
			.iter()
			.enumerate()
			.find(|(_, values)| values.len() != n_columns)
		{
			return Err(MetricsError::RaggedRow {
				row,
				len: values.len(),
				expected: n_columns,
			});
		}
		if n_rows != n_columns {
			return Err(MetricsError::NotSquare { n_rows, n_columns });
		}
		let mut counts = Array2::zeros((n_rows, n_columns));
		for (i, values) in rows.into_iter().enumerate() {
			for (j, value) in values.into_iter().enumerate() {
				counts[(i, j)] = value;
			}
		}
		ConfusionMatrix::new(counts)
	}

	pub fn n_classes(&self) -> usize {
		self.0.nrows()
	}

	pub fn n_examples(&self) -> u64 {
		self.0.sum()
	}

	/// The number of examples of class `actual` predicted as class `predicted`.
	pub fn get(&self, actual: usize, predicted: usize) -> Option<u64> {
		self.0.get((actual, predicted)).copied()
	}

	pub fn view(&self) -> ArrayView2<u64> {
		self.0.view()
	}

	pub fn to_rows(&self) -> Vec<Vec<u64>> {
		self.0.rows().into_iter().map(|row| row.to_vec()).collect()
	}
}

impl TryFrom<Vec<Vec<u64>>> for ConfusionMatrix {
	type Error = MetricsError;
	fn try_from(rows: Vec<Vec<u64>>) -> Result<ConfusionMatrix, MetricsError> {
		ConfusionMatrix::from_rows(rows)
	}
}

impl From<ConfusionMatrix> for Vec<Vec<u64>> {
	fn from(confusion_matrix: ConfusionMatrix) -> Vec<Vec<u64>> {
		confusion_matrix.to_rows()
	}
}

/// Check that `counts` is square and that its total fits in a `u64`.
pub(crate) fn check_counts(counts: ArrayView2<u64>) -> Result<(), MetricsError> {
	let (n_rows, n_columns) = counts.dim();
	if n_rows != n_columns {
		return Err(MetricsError::NotSquare { n_rows, n_columns });
	}
	counts
		.iter()
		.try_fold(0u64, |total, count| total.checked_add(*count))
		.ok_or(MetricsError::CountOverflow)?;
	Ok(())
}

#[test]
fn test_from_rows() {
	let confusion_matrix = ConfusionMatrix::from_rows(vec![vec![50, 2], vec![3, 45]]).unwrap();
	assert_eq!(confusion_matrix.n_classes(), 2);
	assert_eq!(confusion_matrix.n_examples(), 100);
	assert_eq!(confusion_matrix.get(1, 0), Some(3));
	assert_eq!(confusion_matrix.get(2, 0), None);
	assert_eq!(confusion_matrix.to_rows(), vec![vec![50, 2], vec![3, 45]]);
}

#[test]
fn test_from_rows_invalid() {
	assert_eq!(
		ConfusionMatrix::from_rows(vec![vec![1, 2], vec![3]]),
		Err(MetricsError::RaggedRow {
			row: 1,
			len: 1,
			expected: 2
		})
	);
	assert_eq!(
		ConfusionMatrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]),
		Err(MetricsError::NotSquare {
			n_rows: 2,
			n_columns: 3
		})
	);
	assert_eq!(
		ConfusionMatrix::new(Array2::zeros((1, 2))),
		Err(MetricsError::NotSquare {
			n_rows: 1,
			n_columns: 2
		})
	);
	assert!(ConfusionMatrix::from_rows(Vec::new()).is_ok());
	assert_eq!(
		ConfusionMatrix::from_rows(vec![vec![u64::MAX, 1], vec![1, 1]]),
		Err(MetricsError::CountOverflow)
	);
	let confusion_matrix = ConfusionMatrix::from_rows(vec![vec![u64::MAX - 1, 1], vec![0, 0]]);
	assert_eq!(confusion_matrix.map(|c| c.n_examples()), Ok(u64::MAX));
}

#[test]
fn test_serde() {
	let confusion_matrix: ConfusionMatrix = serde_json::from_str("[[1,0],[2,3]]").unwrap();
	assert_eq!(confusion_matrix.get(1, 0), Some(2));
	assert_eq!(
		serde_json::to_string(&confusion_matrix).unwrap(),
		"[[1,0],[2,3]]"
	);
	assert!(serde_json::from_str::<ConfusionMatrix>("[[1,0],[2]]").is_err());
	assert!(serde_json::from_str::<ConfusionMatrix>("[[1,-1],[2,3]]").is_err());
	assert!(
		serde_json::from_str::<ConfusionMatrix>("[[18446744073709551615,1],[1,1]]").is_err()
	);
}
