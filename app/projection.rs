use crate::{Slot, TabState};
use parking_lot::Mutex;
use rice_client::{Client, ProjectionMethod, ProjectionPoint};
use rice_util::format::format_percent_with_precision;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
	pub method: ProjectionMethod,
	pub points: Vec<ProjectionPoint>,
	pub distribution: Vec<ClassShare>,
}

/// How many projected points carry one label.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassShare {
	pub label: String,
	pub count: usize,
	/// `count` as a fraction of all points.
	pub share: f64,
}

impl ClassShare {
	pub fn percent(&self) -> String {
		format_percent_with_precision(self.share, 1)
	}
}

/// Count the points of each label, ordered by label.
pub fn class_distribution(points: &[ProjectionPoint]) -> Vec<ClassShare> {
	let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
	for point in points {
		*counts.entry(point.label.as_str()).or_insert(0) += 1;
	}
	counts
		.into_iter()
		.map(|(label, count)| ClassShare {
			label: label.to_owned(),
			count,
			share: count as f64 / points.len() as f64,
		})
		.collect()
}

pub struct ProjectionTab {
	client: Client,
	method: Mutex<ProjectionMethod>,
	result: Slot<Projection>,
}

impl ProjectionTab {
	pub fn new(client: Client) -> ProjectionTab {
		ProjectionTab {
			client,
			method: Mutex::new(ProjectionMethod::default()),
			result: Slot::new(),
		}
	}

	pub fn method(&self) -> ProjectionMethod {
		*self.method.lock()
	}

	pub fn select(&self, method: ProjectionMethod) {
		*self.method.lock() = method;
	}

	/// Fetch the projection for the selected method.
	pub async fn fetch(&self) -> bool {
		let method = self.method();
		let client = &self.client;
		self.result
			.run(async move {
				let points = client.fetch_projection(method).await?;
				let distribution = class_distribution(&points);
				Ok::<_, rice_client::Error>(Projection {
					method,
					points,
					distribution,
				})
			})
			.await
	}

	/// Select `method` and fetch its projection.
	pub async fn fetch_method(&self, method: ProjectionMethod) -> bool {
		self.select(method);
		self.fetch().await
	}

	pub fn state(&self) -> TabState<Projection> {
		self.result.state()
	}

	pub fn is_loading(&self) -> bool {
		self.result.is_loading()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test::{MockService, Route};

	fn point(x: f64, y: f64, label: &str) -> ProjectionPoint {
		ProjectionPoint {
			x,
			y,
			label: label.to_owned(),
		}
	}

	#[test]
	fn test_class_distribution() {
		let points = vec![
			point(0.0, 0.0, "Jasmine"),
			point(1.0, 0.0, "Arborio"),
			point(0.0, 1.0, "Jasmine"),
			point(1.0, 1.0, "Jasmine"),
		];
		let distribution = class_distribution(&points);
		insta::assert_debug_snapshot!(distribution, @r###"
  [
      ClassShare {
          label: "Arborio",
          count: 1,
          share: 0.25,
      },
      ClassShare {
          label: "Jasmine",
          count: 3,
          share: 0.75,
      },
  ]
  "###);
		assert_eq!(distribution[1].percent(), "75.0%");
		assert!(class_distribution(&[]).is_empty());
	}

	#[tokio::test]
	async fn test_fetch_empty() {
		let service = MockService::start(vec![Route::new("/projection", 200, "[]")]);
		let tab = ProjectionTab::new(service.client());
		assert!(tab.fetch().await);
		let state = tab.state();
		let projection = state.data().unwrap();
		assert_eq!(projection.method, ProjectionMethod::Pca);
		assert!(projection.points.is_empty());
		assert!(projection.distribution.is_empty());
		assert_eq!(service.requests()[0].path_and_query, "/projection?method=pca");
	}

	#[tokio::test]
	async fn test_fetch_method() {
		let body = r#"[{"x":0.5,"y":0.5,"label":"Ipsala"}]"#;
		let service = MockService::start(vec![Route::new("/projection", 200, body)]);
		let tab = ProjectionTab::new(service.client());
		assert!(tab.fetch_method(ProjectionMethod::Tsne).await);
		assert_eq!(tab.method(), ProjectionMethod::Tsne);
		let state = tab.state();
		assert_eq!(state.data().unwrap().distribution[0].percent(), "100%");
		assert_eq!(service.requests()[0].path_and_query, "/projection?method=tsne");
	}

	#[tokio::test]
	async fn test_fetch_failure() {
		let service = MockService::start(vec![Route::new("/projection", 500, "")]);
		let tab = ProjectionTab::new(service.client());
		assert!(tab.fetch().await);
		assert_eq!(tab.state().error(), Some("Failed to fetch projection data"));
	}
}
