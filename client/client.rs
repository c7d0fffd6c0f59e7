use crate::{
	ClientOptions, Error, FeatureVector, MetricsResult, ModelName, PredictAllResult,
	PredictionResult, ProjectionMethod, ProjectionPoint, Result,
};
use serde::de::DeserializeOwned;
use url::Url;

const PREDICT_FAILED: &str = "Failed to predict rice variety";
const PROJECTION_FAILED: &str = "Failed to fetch projection data";
const METRICS_FAILED: &str = "Failed to fetch metrics data";

/// A client for the rice classification service.
///
/// Each call makes a single request with no retries. Cloning is cheap and clones share a connection pool.
#[derive(Clone, Debug)]
pub struct Client {
	http: reqwest::Client,
	base_url: Url,
}

#[derive(serde::Serialize)]
struct PredictRequest<'a> {
	features: &'a FeatureVector,
	#[serde(skip_serializing_if = "Option::is_none")]
	model_name: Option<ModelName>,
}

impl Client {
	pub fn new(options: ClientOptions) -> Result<Client> {
		let base_url = Url::parse(&options.base_url).map_err(|error| {
			Error::InvalidInput(format!("invalid base url {:?}: {}", options.base_url, error))
		})?;
		if base_url.cannot_be_a_base() {
			return Err(Error::InvalidInput(format!(
				"invalid base url {:?}: endpoints cannot be appended to it",
				options.base_url
			)));
		}
		let mut builder = reqwest::Client::builder();
		if let Some(timeout) = options.timeout {
			builder = builder.timeout(timeout);
		}
		let http = builder.build().map_err(Error::Network)?;
		Ok(Client { http, base_url })
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Predict the rice variety of `features` with every model.
	pub async fn predict_all(&self, features: &FeatureVector) -> Result<PredictAllResult> {
		let url = self.endpoint(&["predict-all"]);
		tracing::debug!(%url, n_features = features.len(), "predicting with all models");
		let body = PredictRequest {
			features,
			model_name: None,
		};
		self.send(self.http.post(url).json(&body), PREDICT_FAILED)
			.await
	}

	/// Predict the rice variety of `features` with a single model.
	pub async fn predict(
		&self,
		features: &FeatureVector,
		model_name: ModelName,
	) -> Result<PredictionResult> {
		let url = self.endpoint(&["predict"]);
		tracing::debug!(%url, %model_name, n_features = features.len(), "predicting");
		let body = PredictRequest {
			features,
			model_name: Some(model_name),
		};
		self.send(self.http.post(url).json(&body), PREDICT_FAILED)
			.await
	}

	/// Fetch the 2D projection of the whole dataset.
	pub async fn fetch_projection(&self, method: ProjectionMethod) -> Result<Vec<ProjectionPoint>> {
		let mut url = self.endpoint(&["projection"]);
		url.query_pairs_mut().append_pair("method", method.as_str());
		tracing::debug!(%url, "fetching projection");
		self.send(self.http.get(url), PROJECTION_FAILED).await
	}

	/// Fetch the evaluation metrics of one model. The confusion matrix is checked against the labels before this returns.
	pub async fn fetch_metrics(&self, model_name: ModelName) -> Result<MetricsResult> {
		let url = self.endpoint(&["metrics", model_name.as_str()]);
		tracing::debug!(%url, "fetching metrics");
		let metrics: MetricsResult = self.send(self.http.get(url), METRICS_FAILED).await?;
		metrics.validate()?;
		Ok(metrics)
	}

	fn endpoint(&self, segments: &[&str]) -> Url {
		let mut url = self.base_url.clone();
		// The base url was checked to be a base in new().
		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend(segments);
		}
		url
	}

	async fn send<T>(&self, request: reqwest::RequestBuilder, failure: &'static str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = request.send().await.map_err(|error| {
			tracing::warn!(%error, "request failed");
			Error::Network(error)
		})?;
		let status = response.status();
		if !status.is_success() {
			tracing::warn!(%status, "{}", failure);
			return Err(Error::Service {
				message: failure,
				status,
			});
		}
		let body = response.bytes().await.map_err(Error::Network)?;
		serde_json::from_slice(&body).map_err(|error| {
			tracing::warn!(%error, "unexpected response body");
			Error::invalid_response(error)
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use hyper::{Body, Method, Request, Response, StatusCode};
	use rice_util::serve::{self, Serving};
	use std::{
		sync::{Arc, Mutex},
		time::Duration,
	};

	struct Mock {
		status: StatusCode,
		body: &'static str,
		delay: Option<Duration>,
		requests: Mutex<Vec<Recorded>>,
	}

	#[derive(Clone, Debug)]
	struct Recorded {
		method: Method,
		path_and_query: String,
		body: serde_json::Value,
	}

	fn mock(status: u16, body: &'static str) -> Mock {
		Mock {
			status: StatusCode::from_u16(status).unwrap(),
			body,
			delay: None,
			requests: Mutex::new(Vec::new()),
		}
	}

	fn start(mock: Mock, base_path: &str) -> (Serving, Arc<Mock>, Client) {
		let mock = Arc::new(mock);
		let context = mock.clone();
		let serving = serve::spawn(
			([127, 0, 0, 1], 0).into(),
			context,
			|mock: Arc<Arc<Mock>>, request: Request<Body>| async move {
				let method = request.method().clone();
				let path_and_query = request
					.uri()
					.path_and_query()
					.map(|p| p.as_str().to_owned())
					.unwrap_or_default();
				let body = hyper::body::to_bytes(request.into_body()).await.unwrap();
				let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
				mock.requests.lock().unwrap().push(Recorded {
					method,
					path_and_query,
					body,
				});
				if let Some(delay) = mock.delay {
					tokio::time::sleep(delay).await;
				}
				let mut response = Response::new(Body::from(mock.body));
				*response.status_mut() = mock.status;
				response
			},
		)
		.unwrap();
		let client = Client::new(ClientOptions {
			base_url: format!("{}{}", serving.url(), base_path),
			timeout: Some(Duration::from_secs(5)),
		})
		.unwrap();
		(serving, mock, client)
	}

	fn recorded(mock: &Mock) -> Vec<Recorded> {
		mock.requests.lock().unwrap().clone()
	}

	const PREDICTION: &str = r#"{"predicted_class":"Jasmine","probabilities":{"Jasmine":0.8,"Basmati":0.2}}"#;

	#[tokio::test]
	async fn test_predict_all() {
		let body = Box::leak(
			format!(
				r#"{{"knn":{p},"svm":{p},"nb":{p}}}"#,
				p = PREDICTION
			)
			.into_boxed_str(),
		);
		let (_serving, mock, client) = start(mock(200, body), "");
		let mut features = FeatureVector::new();
		features.insert("AREA".to_owned(), 7805.0);
		features.insert("PERIMETER".to_owned(), 0.0);
		let result = client.predict_all(&features).await.unwrap();
		assert_eq!(result.get(ModelName::Svm).predicted_class, "Jasmine");
		assert_eq!(result.iter().count(), 3);
		let requests = recorded(&mock);
		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].method, Method::POST);
		assert_eq!(requests[0].path_and_query, "/predict-all");
		assert_eq!(
			requests[0].body,
			serde_json::json!({ "features": { "AREA": 7805.0, "PERIMETER": 0.0 } })
		);
	}

	#[tokio::test]
	async fn test_predict_all_server_error() {
		let (_serving, _mock, client) = start(mock(500, r#"{"detail":"boom"}"#), "");
		let error = client.predict_all(&FeatureVector::new()).await.unwrap_err();
		assert_eq!(error.to_string(), "Failed to predict rice variety");
		assert_eq!(error.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
	}

	#[tokio::test]
	async fn test_predict_all_missing_model() {
		let body = Box::leak(format!(r#"{{"knn":{p},"svm":{p}}}"#, p = PREDICTION).into_boxed_str());
		let (_serving, _mock, client) = start(mock(200, body), "");
		let error = client.predict_all(&FeatureVector::new()).await.unwrap_err();
		assert!(matches!(error, Error::InvalidResponse(_)));
		assert_eq!(error.to_string(), "Invalid response shape");
	}

	#[tokio::test]
	async fn test_predict_single_model() {
		let (_serving, mock, client) = start(mock(200, PREDICTION), "/api/");
		let features = FeatureVector::new();
		let result = client.predict(&features, ModelName::Nb).await.unwrap();
		assert_eq!(result.confidence(), 0.8);
		let requests = recorded(&mock);
		assert_eq!(requests[0].path_and_query, "/api/predict");
		assert_eq!(
			requests[0].body,
			serde_json::json!({ "features": {}, "model_name": "nb" })
		);
	}

	#[tokio::test]
	async fn test_fetch_projection_empty() {
		let (_serving, mock, client) = start(mock(200, "[]"), "");
		let points = client.fetch_projection(ProjectionMethod::Pca).await.unwrap();
		assert!(points.is_empty());
		let requests = recorded(&mock);
		assert_eq!(requests[0].method, Method::GET);
		assert_eq!(requests[0].path_and_query, "/projection?method=pca");
	}

	#[tokio::test]
	async fn test_fetch_projection() {
		let body = r#"[{"x":1.5,"y":-0.25,"label":"Ipsala"},{"x":0,"y":2,"label":"Arborio"}]"#;
		let (_serving, mock, client) = start(mock(200, body), "");
		let points = client.fetch_projection(ProjectionMethod::Tsne).await.unwrap();
		assert_eq!(
			points,
			vec![
				ProjectionPoint {
					x: 1.5,
					y: -0.25,
					label: "Ipsala".to_owned()
				},
				ProjectionPoint {
					x: 0.0,
					y: 2.0,
					label: "Arborio".to_owned()
				},
			]
		);
		assert_eq!(recorded(&mock)[0].path_and_query, "/projection?method=tsne");
	}

	#[tokio::test]
	async fn test_fetch_projection_server_error() {
		let (_serving, _mock, client) = start(mock(503, ""), "");
		let error = client
			.fetch_projection(ProjectionMethod::Pca)
			.await
			.unwrap_err();
		assert_eq!(error.to_string(), "Failed to fetch projection data");
	}

	#[tokio::test]
	async fn test_fetch_metrics() {
		let body = r#"{"accuracy":0.95,"confusion_matrix":[[50,2],[3,45]],"labels":["Jasmine","Basmati"]}"#;
		let (_serving, mock, client) = start(mock(200, body), "");
		let metrics = client.fetch_metrics(ModelName::Knn).await.unwrap();
		assert_eq!(metrics.accuracy, 0.95);
		assert_eq!(recorded(&mock)[0].path_and_query, "/metrics/knn");
		let display: Vec<_> = metrics
			.class_metrics()
			.unwrap()
			.iter()
			.map(|class_metrics| class_metrics.display())
			.collect();
		insta::assert_debug_snapshot!(display[0], @r###"
  ClassMetricsDisplay {
      label: "Jasmine",
      precision: "0.943",
      recall: "0.962",
      f1_score: "0.952",
  }
  "###);
	}

	#[tokio::test]
	async fn test_fetch_metrics_invalid_shape() {
		let body = r#"{"accuracy":0.95,"confusion_matrix":[[50,2],[3,45]],"labels":["Jasmine"]}"#;
		let (_serving, _mock, client) = start(mock(200, body), "");
		let error = client.fetch_metrics(ModelName::Svm).await.unwrap_err();
		assert_eq!(error.to_string(), "Invalid response shape");
		let body = r#"{"accuracy":0.95,"confusion_matrix":[[50,2,1],[3,45,0]],"labels":["Jasmine","Basmati"]}"#;
		let (_serving, _mock, client) = start(mock(200, body), "");
		let error = client.fetch_metrics(ModelName::Svm).await.unwrap_err();
		assert!(matches!(error, Error::InvalidResponse(_)));
		let (_serving, _mock, client) = start(mock(200, "<html></html>"), "");
		let error = client.fetch_metrics(ModelName::Svm).await.unwrap_err();
		assert!(matches!(error, Error::InvalidResponse(_)));
		let body = r#"{"accuracy":0.5,"confusion_matrix":[[18446744073709551615,1],[1,1]],"labels":["Jasmine","Basmati"]}"#;
		let (_serving, _mock, client) = start(mock(200, body), "");
		let error = client.fetch_metrics(ModelName::Knn).await.unwrap_err();
		assert_eq!(error.to_string(), "Invalid response shape");
	}

	#[tokio::test]
	async fn test_fetch_metrics_server_error() {
		let (_serving, _mock, client) = start(mock(404, "not found"), "");
		let error = client.fetch_metrics(ModelName::Nb).await.unwrap_err();
		assert_eq!(error.to_string(), "Failed to fetch metrics data");
	}

	#[tokio::test]
	async fn test_connection_refused() {
		// Bind and release a port so nothing is listening on it.
		let port = std::net::TcpListener::bind("127.0.0.1:0")
			.unwrap()
			.local_addr()
			.unwrap()
			.port();
		let client = Client::new(ClientOptions {
			base_url: format!("http://127.0.0.1:{}", port),
			timeout: None,
		})
		.unwrap();
		let error = client
			.fetch_projection(ProjectionMethod::Pca)
			.await
			.unwrap_err();
		assert!(matches!(error, Error::Network(_)));
		assert_eq!(error.status(), None);
	}

	#[tokio::test]
	async fn test_timeout() {
		let mut slow = mock(200, "[]");
		slow.delay = Some(Duration::from_secs(2));
		let (serving, _mock, _client) = start(slow, "");
		let client = Client::new(ClientOptions {
			base_url: serving.url(),
			timeout: Some(Duration::from_millis(100)),
		})
		.unwrap();
		let error = client
			.fetch_projection(ProjectionMethod::Pca)
			.await
			.unwrap_err();
		assert!(error.is_timeout());
	}

	#[test]
	fn test_new() {
		let client = Client::new(ClientOptions::default()).unwrap();
		assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
		assert_eq!(
			client.endpoint(&["metrics", "knn"]).as_str(),
			"http://localhost:8000/metrics/knn"
		);
		let error = Client::new(ClientOptions {
			base_url: "localhost:8000".to_owned(),
			timeout: None,
		})
		.unwrap_err();
		assert!(matches!(error, Error::InvalidInput(_)));
		assert!(Client::new(ClientOptions {
			base_url: "not a url".to_owned(),
			timeout: None,
		})
		.is_err());
	}
}
