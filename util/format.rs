pub fn format_percent(value: f64) -> String {
	format_percent_with_precision(value, 2)
}

pub fn format_percent_with_precision(value: f64, precision: usize) -> String {
	if f64::abs(value - 1.0) <= f64::EPSILON {
		"100%".to_owned()
	} else {
		format!("{:.1$}%", value * 100.0, precision)
	}
}

/// Format `value` with exactly `precision` digits after the decimal point.
pub fn format_fixed(value: f64, precision: usize) -> String {
	format!("{:.1$}", value, precision)
}

#[test]
fn test_format_percent() {
	assert_eq!(format_percent(0.0), "0.00%");
	assert_eq!(format_percent(0.424292), "42.43%");
	assert_eq!(format_percent_with_precision(0.424292, 3), "42.429%");
	assert_eq!(format_percent_with_precision(0.25, 1), "25.0%");
	assert_eq!(format_percent(1.00), "100%");
}

#[test]
fn test_format_fixed() {
	assert_eq!(format_fixed(50.0 / 53.0, 3), "0.943");
	assert_eq!(format_fixed(0.0, 3), "0.000");
	assert_eq!(format_fixed(1.0, 3), "1.000");
}
