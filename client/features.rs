/*!
Rice grain features are organized in named groups. A prediction request must carry every feature of every group, so [`FeatureForm`](struct.FeatureForm.html) starts with all of them set to 0.
*/

use crate::{Error, FeatureVector};
use rand::Rng;

#[derive(Clone, Debug, PartialEq)]
pub struct FeatureGroup {
	pub name: String,
	pub features: Vec<String>,
}

/// Ordered feature groups.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureGroups(Vec<FeatureGroup>);

const MORPHOLOGICAL: &[&str] = &[
	"AREA",
	"PERIMETER",
	"MAJOR_AXIS",
	"MINOR_AXIS",
	"ECCENTRICITY",
	"EQDIASQ",
	"SOLIDITY",
	"CONVEX_AREA",
	"EXTENT",
	"ASPECT_RATIO",
	"ROUNDNESS",
	"COMPACTNESS",
];

const SHAPE: &[&str] = &[
	"SHAPEFACTOR_1",
	"SHAPEFACTOR_2",
	"SHAPEFACTOR_3",
	"SHAPEFACTOR_4",
];

const COLOR: &[&str] = &[
	"MEAN_RR",
	"MEAN_RG",
	"MEAN_RB",
	"STDDEV_RR",
	"STDDEV_RG",
	"STDDEV_RB",
	"SKEW_RR",
	"SKEW_RG",
	"SKEW_RB",
	"KURTOSIS_RR",
	"KURTOSIS_RG",
	"KURTOSIS_RB",
];

impl FeatureGroups {
	pub fn new(groups: Vec<FeatureGroup>) -> FeatureGroups {
		FeatureGroups(groups)
	}

	/// The morphological, shape and color features the rice models were trained on.
	pub fn rice() -> FeatureGroups {
		let group = |name: &str, features: &[&str]| FeatureGroup {
			name: name.to_owned(),
			features: features.iter().map(|feature| (*feature).to_owned()).collect(),
		};
		FeatureGroups(vec![
			group("Morphological", MORPHOLOGICAL),
			group("Shape", SHAPE),
			group("Color", COLOR),
		])
	}

	pub fn iter(&self) -> impl Iterator<Item = &FeatureGroup> {
		self.0.iter()
	}

	/// Every feature name, group by group.
	pub fn feature_names(&self) -> Vec<&str> {
		self.0
			.iter()
			.flat_map(|group| group.features.iter().map(String::as_str))
			.collect()
	}
}

impl Default for FeatureGroups {
	fn default() -> FeatureGroups {
		FeatureGroups::rice()
	}
}

/// Draw an independent uniform value in [0, 1) for each feature name.
pub fn generate_random_features<I, S>(feature_names: I) -> FeatureVector
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut rng = rand::thread_rng();
	feature_names
		.into_iter()
		.map(|name| (name.into(), rng.gen::<f64>()))
		.collect()
}

/// The values of a feature input form. Every feature is always present.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureForm {
	features: FeatureVector,
}

impl FeatureForm {
	pub fn new(groups: &FeatureGroups) -> FeatureForm {
		let features = groups
			.feature_names()
			.into_iter()
			.map(|name| (name.to_owned(), 0.0))
			.collect();
		FeatureForm { features }
	}

	/// Set a feature from user text. The number at the start of the text is used, so `"12abc"` sets 12. Text that does not start with a finite number sets the feature to 0.
	pub fn set(&mut self, name: &str, text: &str) -> Result<f64, Error> {
		let value = match lexical::parse_partial::<f64, _>(text.trim()) {
			Ok((value, _)) if value.is_finite() => value,
			_ => 0.0,
		};
		self.set_value(name, value)?;
		Ok(value)
	}

	pub fn set_value(&mut self, name: &str, value: f64) -> Result<(), Error> {
		match self.features.get_mut(name) {
			Some(feature) => {
				*feature = value;
				Ok(())
			}
			None => Err(Error::InvalidInput(format!("unknown feature {:?}", name))),
		}
	}

	/// Replace every value with a random one.
	pub fn randomize(&mut self) {
		self.features = generate_random_features(self.features.keys().cloned().collect::<Vec<_>>());
	}

	pub fn features(&self) -> &FeatureVector {
		&self.features
	}
}

#[test]
fn test_generate_random_features() {
	let features = generate_random_features(vec!["a", "b"]);
	let keys: Vec<_> = features.keys().map(String::as_str).collect();
	assert_eq!(keys, vec!["a", "b"]);
	assert!(features.values().all(|value| (0.0..1.0).contains(value)));
	// Sixteen draws all matching the first batch would mean the generator is not random.
	let batches: Vec<_> = (0..16)
		.map(|_| generate_random_features(vec!["a", "b"]))
		.collect();
	assert!(batches.iter().any(|batch| batch != &features));
}

#[test]
fn test_feature_groups() {
	let groups = FeatureGroups::rice();
	let names: Vec<_> = groups.iter().map(|group| group.name.as_str()).collect();
	assert_eq!(names, vec!["Morphological", "Shape", "Color"]);
	let feature_names = groups.feature_names();
	assert_eq!(feature_names.len(), 28);
	assert_eq!(feature_names[0], "AREA");
	assert_eq!(feature_names[12], "SHAPEFACTOR_1");
}

#[test]
fn test_feature_form() {
	let groups = FeatureGroups::rice();
	let mut form = FeatureForm::new(&groups);
	assert_eq!(form.features().len(), 28);
	assert!(form.features().values().all(|value| *value == 0.0));
	assert_eq!(form.set("AREA", " 7805 ").unwrap(), 7805.0);
	assert_eq!(form.set("PERIMETER", "not a number").unwrap(), 0.0);
	assert_eq!(form.set("EXTENT", "NaN").unwrap(), 0.0);
	assert_eq!(form.set("EXTENT", "").unwrap(), 0.0);
	assert_eq!(form.set("SOLIDITY", "12abc").unwrap(), 12.0);
	assert_eq!(form.set("ROUNDNESS", "-0.5 mm").unwrap(), -0.5);
	assert_eq!(form.features()["AREA"], 7805.0);
	assert!(form.set("COLOR", "1").is_err());
	form.randomize();
	assert_eq!(form.features().len(), 28);
	assert!(form
		.features()
		.values()
		.all(|value| (0.0..1.0).contains(value)));
}
