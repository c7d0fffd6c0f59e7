/// A plain text table with a header row, rendered with `|` separated columns.
pub struct Table {
	header: Vec<String>,
	rows: Vec<Vec<String>>,
}

impl Table {
	pub fn new<I, S>(header: I) -> Table
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Table {
			header: header.into_iter().map(Into::into).collect(),
			rows: Vec::new(),
		}
	}

	/// Append a row. Missing cells are left blank and extra cells are dropped.
	pub fn push_row<I, S>(&mut self, row: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut row: Vec<String> = row.into_iter().map(Into::into).collect();
		row.resize(self.header.len(), String::new());
		self.rows.push(row);
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	fn column_widths(&self) -> Vec<usize> {
		let mut widths: Vec<usize> = self.header.iter().map(|cell| cell.chars().count()).collect();
		for row in self.rows.iter() {
			for (width, cell) in widths.iter_mut().zip(row) {
				*width = usize::max(*width, cell.chars().count());
			}
		}
		widths
	}
}

impl std::fmt::Display for Table {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		let widths = self.column_widths();
		write_row(f, &widths, &self.header)?;
		write!(f, "|")?;
		for width in widths.iter() {
			write!(f, "{:-<1$}|", "", width + 2)?;
		}
		writeln!(f)?;
		for row in self.rows.iter() {
			write_row(f, &widths, row)?;
		}
		Ok(())
	}
}

fn write_row(f: &mut std::fmt::Formatter, widths: &[usize], cells: &[String]) -> std::fmt::Result {
	write!(f, "|")?;
	for (width, cell) in widths.iter().zip(cells) {
		write!(f, " {:<1$} |", cell, width)?;
	}
	writeln!(f)
}

#[test]
fn test_table() {
	let mut table = Table::new(vec!["Class", "Precision"]);
	table.push_row(vec!["Jasmine", "0.943"]);
	table.push_row(vec!["Basmati"]);
	let expected = "\
| Class   | Precision |
|---------|-----------|
| Jasmine | 0.943     |
| Basmati |           |
";
	assert_eq!(table.to_string(), expected);
}

#[test]
fn test_table_wide_characters() {
	let mut table = Table::new(vec!["Sınıf"]);
	table.push_row(vec!["Karacadağ", "dropped"]);
	assert_eq!(table.to_string(), "| Sınıf     |\n|-----------|\n| Karacadağ |\n");
}
