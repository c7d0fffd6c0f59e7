use crate::{Slot, TabState};
use parking_lot::Mutex;
use rice_client::{
	Client, FeatureForm, FeatureGroups, FeatureVector, ModelName, PredictAllResult,
	PredictionResult,
};

/// The result shown by the prediction tab.
#[derive(Clone, Debug, PartialEq)]
pub enum Prediction {
	All(PredictAllResult),
	Single(ModelName, PredictionResult),
}

impl Prediction {
	/// Each model's result, in model order.
	pub fn iter(&self) -> Box<dyn Iterator<Item = (ModelName, &PredictionResult)> + '_> {
		match self {
			Prediction::All(result) => Box::new(result.iter()),
			Prediction::Single(model_name, result) => {
				Box::new(std::iter::once((*model_name, result)))
			}
		}
	}
}

/// Feature input and prediction results.
pub struct PredictTab {
	client: Client,
	groups: FeatureGroups,
	form: Mutex<FeatureForm>,
	result: Slot<Prediction>,
}

impl PredictTab {
	pub fn new(client: Client) -> PredictTab {
		PredictTab::with_groups(client, FeatureGroups::rice())
	}

	pub fn with_groups(client: Client, groups: FeatureGroups) -> PredictTab {
		let form = Mutex::new(FeatureForm::new(&groups));
		PredictTab {
			client,
			groups,
			form,
			result: Slot::new(),
		}
	}

	pub fn groups(&self) -> &FeatureGroups {
		&self.groups
	}

	/// Set a feature from user text. See [`FeatureForm::set`].
	pub fn set(&self, name: &str, text: &str) -> Result<f64, rice_client::Error> {
		self.form.lock().set(name, text)
	}

	pub fn randomize(&self) {
		self.form.lock().randomize();
	}

	pub fn features(&self) -> FeatureVector {
		self.form.lock().features().clone()
	}

	/// Predict the current features with every model.
	pub async fn submit(&self) -> bool {
		let features = self.features();
		let client = &self.client;
		self.result
			.run(async move { client.predict_all(&features).await.map(Prediction::All) })
			.await
	}

	/// Predict the current features with one model.
	pub async fn submit_model(&self, model_name: ModelName) -> bool {
		let features = self.features();
		let client = &self.client;
		self.result
			.run(async move {
				client
					.predict(&features, model_name)
					.await
					.map(|result| Prediction::Single(model_name, result))
			})
			.await
	}

	pub fn state(&self) -> TabState<Prediction> {
		self.result.state()
	}

	pub fn is_loading(&self) -> bool {
		self.result.is_loading()
	}
}
