use futures::FutureExt;
use hyper::{
	service::{make_service_fn, service_fn},
	Body, Request, Response, Server, StatusCode,
};
use std::{
	convert::Infallible, future::Future, net::SocketAddr, panic::AssertUnwindSafe, sync::Arc,
};

/// A server running on a background task. The task is aborted when this value is dropped.
pub struct Serving {
	addr: SocketAddr,
	task: tokio::task::JoinHandle<hyper::Result<()>>,
}

impl Serving {
	pub fn addr(&self) -> SocketAddr {
		self.addr
	}

	pub fn url(&self) -> String {
		format!("http://{}", self.addr)
	}
}

impl Drop for Serving {
	fn drop(&mut self) {
		self.task.abort();
	}
}

/// Bind `addr` and serve every request with `request_handler` on a background task.
///
/// Binding port 0 picks a free port, which is available from [`Serving::addr`]. A panic in the handler produces a 500 response instead of tearing down the connection. Must be called from within a tokio runtime.
pub fn spawn<C, H, F>(
	addr: SocketAddr,
	request_handler_context: C,
	request_handler: H,
) -> hyper::Result<Serving>
where
	C: Send + Sync + 'static,
	H: Fn(Arc<C>, Request<Body>) -> F + Send + Sync + 'static,
	F: Future<Output = Response<Body>> + Send + 'static,
{
	// Wrap the request handler and context with Arc to allow sharing a reference to it with each task.
	let request_handler = Arc::new(request_handler);
	let request_handler_context = Arc::new(request_handler_context);
	let service = make_service_fn(move |_| {
		let request_handler = request_handler.clone();
		let request_handler_context = request_handler_context.clone();
		async move {
			Ok::<_, Infallible>(service_fn(move |request| {
				let request_handler = request_handler.clone();
				let request_handler_context = request_handler_context.clone();
				async move {
					Ok::<_, Infallible>(
						service(request_handler, request_handler_context, request).await,
					)
				}
			}))
		}
	});
	let server = Server::try_bind(&addr)?.serve(service);
	let addr = server.local_addr();
	tracing::debug!(%addr, "serving");
	let task = tokio::spawn(server);
	Ok(Serving { addr, task })
}

async fn service<C, H, F>(
	request_handler: Arc<H>,
	request_handler_context: Arc<C>,
	request: Request<Body>,
) -> Response<Body>
where
	H: Fn(Arc<C>, Request<Body>) -> F,
	F: Future<Output = Response<Body>>,
{
	let method = request.method().clone();
	let path = request.uri().path().to_owned();
	let result = AssertUnwindSafe(request_handler(request_handler_context, request))
		.catch_unwind()
		.await;
	match result {
		Ok(response) => {
			tracing::debug!(%method, %path, status = %response.status());
			response
		}
		Err(_) => {
			tracing::error!(%method, %path, "request handler panicked");
			let mut response = Response::new(Body::from("internal server error"));
			*response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
			response
		}
	}
}

#[tokio::test]
async fn test_spawn() {
	let serving = spawn(
		([127, 0, 0, 1], 0).into(),
		"pong",
		|context: Arc<&'static str>, request: Request<Body>| async move {
			if request.uri().path() == "/panic" {
				panic!("handler failure");
			}
			Response::new(Body::from(*context))
		},
	)
	.unwrap();
	assert_ne!(serving.addr().port(), 0);
	let client = hyper::Client::new();
	let uri: hyper::Uri = format!("{}/ping", serving.url()).parse().unwrap();
	let response = client.get(uri).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
	assert_eq!(&body[..], b"pong");
	let uri: hyper::Uri = format!("{}/panic", serving.url()).parse().unwrap();
	let response = client.get(uri).await.unwrap();
	assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
