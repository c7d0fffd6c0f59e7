//! An in-process stand in for the rice classification service.

use hyper::{Body, Request, Response, StatusCode};
use parking_lot::Mutex;
use rice_client::{Client, ClientOptions};
use rice_util::serve::{self, Serving};
use std::{sync::Arc, time::Duration};

#[derive(Clone)]
pub struct Route {
	path: String,
	status: u16,
	body: String,
	delay: Option<Duration>,
}

impl Route {
	pub fn new(path: &str, status: u16, body: impl Into<String>) -> Route {
		Route {
			path: path.to_owned(),
			status,
			body: body.into(),
			delay: None,
		}
	}

	pub fn delayed(mut self, delay: Duration) -> Route {
		self.delay = Some(delay);
		self
	}
}

#[derive(Clone, Debug)]
pub struct Recorded {
	pub path_and_query: String,
	pub body: serde_json::Value,
}

struct State {
	routes: Mutex<Vec<Route>>,
	requests: Mutex<Vec<Recorded>>,
}

pub struct MockService {
	serving: Serving,
	state: Arc<State>,
}

impl MockService {
	pub fn start(routes: Vec<Route>) -> MockService {
		let state = Arc::new(State {
			routes: Mutex::new(routes),
			requests: Mutex::new(Vec::new()),
		});
		let serving = serve::spawn(([127, 0, 0, 1], 0).into(), state.clone(), handle).unwrap();
		MockService { serving, state }
	}

	pub fn client(&self) -> Client {
		Client::new(ClientOptions {
			base_url: self.serving.url(),
			timeout: Some(Duration::from_secs(5)),
		})
		.unwrap()
	}

	pub fn requests(&self) -> Vec<Recorded> {
		self.state.requests.lock().clone()
	}

	pub fn set_status(&self, path: &str, status: u16) {
		for route in self.state.routes.lock().iter_mut() {
			if route.path == path {
				route.status = status;
			}
		}
	}
}

async fn handle(state: Arc<Arc<State>>, request: Request<Body>) -> Response<Body> {
	let path = request.uri().path().to_owned();
	let path_and_query = request
		.uri()
		.path_and_query()
		.map(|p| p.as_str().to_owned())
		.unwrap_or_default();
	let body = hyper::body::to_bytes(request.into_body()).await.unwrap();
	let body = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
	state.requests.lock().push(Recorded {
		path_and_query,
		body,
	});
	let route = state
		.routes
		.lock()
		.iter()
		.find(|route| route.path == path)
		.cloned();
	let route = match route {
		Some(route) => route,
		None => {
			let mut response = Response::new(Body::from("not found"));
			*response.status_mut() = StatusCode::NOT_FOUND;
			return response;
		}
	};
	if let Some(delay) = route.delay {
		tokio::time::sleep(delay).await;
	}
	let mut response = Response::new(Body::from(route.body));
	*response.status_mut() = StatusCode::from_u16(route.status).unwrap();
	response
}
