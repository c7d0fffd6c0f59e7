use parking_lot::Mutex;
use std::{fmt::Display, future::Future};

const FALLBACK_ERROR_MESSAGE: &str = "An error occurred";

/// A snapshot of a tab's lifecycle.
///
/// While loading and after a failure, the last successful value is kept as `stale` so a host can choose to keep showing it.
#[derive(Clone, Debug, PartialEq)]
pub enum TabState<T> {
	Idle,
	Loading { stale: Option<T> },
	Success(T),
	Failure { message: String, stale: Option<T> },
}

impl<T> TabState<T> {
	pub fn is_loading(&self) -> bool {
		matches!(self, TabState::Loading { .. })
	}

	/// The value of the latest request, if it succeeded.
	pub fn data(&self) -> Option<&T> {
		match self {
			TabState::Success(value) => Some(value),
			_ => None,
		}
	}

	/// The latest successful value, including one kept from before the current request.
	pub fn last_success(&self) -> Option<&T> {
		match self {
			TabState::Idle => None,
			TabState::Success(value) => Some(value),
			TabState::Loading { stale } | TabState::Failure { stale, .. } => stale.as_ref(),
		}
	}

	pub fn error(&self) -> Option<&str> {
		match self {
			TabState::Failure { message, .. } => Some(message),
			_ => None,
		}
	}

	fn into_last_success(self) -> Option<T> {
		match self {
			TabState::Idle => None,
			TabState::Success(value) => Some(value),
			TabState::Loading { stale } | TabState::Failure { stale, .. } => stale,
		}
	}
}

impl<T> Default for TabState<T> {
	fn default() -> TabState<T> {
		TabState::Idle
	}
}

/// Identifies one request started with [`Slot::begin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Holds the state of one tab. Every [`begin`](Slot::begin) starts a new generation and only a result carrying the current generation's ticket is stored.
pub struct Slot<T> {
	inner: Mutex<Inner<T>>,
}

struct Inner<T> {
	generation: u64,
	state: TabState<T>,
}

impl<T> Slot<T>
where
	T: Clone,
{
	pub fn new() -> Slot<T> {
		Slot {
			inner: Mutex::new(Inner {
				generation: 0,
				state: TabState::Idle,
			}),
		}
	}

	/// Move to loading, clearing any error. Results of earlier tickets will be ignored from now on.
	pub fn begin(&self) -> Ticket {
		let mut inner = self.inner.lock();
		inner.generation += 1;
		let previous = std::mem::take(&mut inner.state);
		inner.state = TabState::Loading {
			stale: previous.into_last_success(),
		};
		Ticket(inner.generation)
	}

	/// Store the result of the request identified by `ticket`. Returns false and leaves the state untouched if a newer request has begun since.
	pub fn finish<E>(&self, ticket: Ticket, result: Result<T, E>) -> bool
	where
		E: Display,
	{
		let mut inner = self.inner.lock();
		if ticket.0 != inner.generation {
			tracing::debug!(
				ticket = ticket.0,
				generation = inner.generation,
				"dropping superseded result"
			);
			return false;
		}
		let previous = std::mem::take(&mut inner.state);
		inner.state = match result {
			Ok(value) => TabState::Success(value),
			Err(error) => {
				let message = error_message(&error);
				tracing::debug!(%message, "request failed");
				TabState::Failure {
					message,
					stale: previous.into_last_success(),
				}
			}
		};
		true
	}

	/// Begin a request, await `future` and store its result.
	pub async fn run<F, E>(&self, future: F) -> bool
	where
		F: Future<Output = Result<T, E>>,
		E: Display,
	{
		let ticket = self.begin();
		let result = future.await;
		self.finish(ticket, result)
	}

	/// Go back to idle, dropping any value and ignoring requests in flight.
	pub fn reset(&self) {
		let mut inner = self.inner.lock();
		inner.generation += 1;
		inner.state = TabState::Idle;
	}

	pub fn state(&self) -> TabState<T> {
		self.inner.lock().state.clone()
	}

	pub fn is_loading(&self) -> bool {
		self.inner.lock().state.is_loading()
	}
}

impl<T> Default for Slot<T>
where
	T: Clone,
{
	fn default() -> Slot<T> {
		Slot::new()
	}
}

/// The message to show for a failed request.
pub fn error_message<E>(error: &E) -> String
where
	E: Display + ?Sized,
{
	let message = error.to_string();
	if message.is_empty() {
		FALLBACK_ERROR_MESSAGE.to_owned()
	} else {
		message
	}
}

#[test]
fn test_lifecycle() {
	let slot = Slot::<u32>::new();
	assert_eq!(slot.state(), TabState::Idle);
	let ticket = slot.begin();
	assert!(slot.is_loading());
	assert_eq!(slot.state(), TabState::Loading { stale: None });
	assert!(slot.finish(ticket, Ok::<_, String>(1)));
	assert_eq!(slot.state(), TabState::Success(1));
	assert_eq!(slot.state().data(), Some(&1));
}

#[test]
fn test_begin_clears_error_and_keeps_stale_value() {
	let slot = Slot::<u32>::new();
	let ticket = slot.begin();
	slot.finish(ticket, Ok::<_, String>(1));
	let ticket = slot.begin();
	assert_eq!(slot.state(), TabState::Loading { stale: Some(1) });
	slot.finish(ticket, Err("Failed to fetch metrics data"));
	let state = slot.state();
	assert_eq!(state.error(), Some("Failed to fetch metrics data"));
	assert_eq!(state.data(), None);
	assert_eq!(state.last_success(), Some(&1));
	slot.begin();
	let state = slot.state();
	assert_eq!(state.error(), None);
	assert_eq!(state, TabState::Loading { stale: Some(1) });
}

#[test]
fn test_superseded_result_is_dropped() {
	let slot = Slot::<u32>::new();
	let first = slot.begin();
	let second = slot.begin();
	assert!(slot.finish(second, Ok::<_, String>(2)));
	assert!(!slot.finish(first, Ok::<_, String>(1)));
	assert_eq!(slot.state(), TabState::Success(2));
	let third = slot.begin();
	let fourth = slot.begin();
	assert!(!slot.finish(third, Err("stale failure")));
	assert_eq!(slot.state(), TabState::Loading { stale: Some(2) });
	assert!(slot.finish(fourth, Ok::<_, String>(4)));
}

#[test]
fn test_reset() {
	let slot = Slot::<u32>::new();
	let ticket = slot.begin();
	slot.reset();
	assert!(!slot.finish(ticket, Ok::<_, String>(1)));
	assert_eq!(slot.state(), TabState::Idle);
}

#[test]
fn test_error_message() {
	assert_eq!(error_message("Failed to predict rice variety"), "Failed to predict rice variety");
	assert_eq!(error_message(""), "An error occurred");
}

#[cfg(test)]
#[tokio::test]
async fn test_run() {
	let slot = Slot::<u32>::new();
	assert!(slot.run(async { Ok::<_, String>(3) }).await);
	assert_eq!(slot.state(), TabState::Success(3));
	assert!(slot.run(async { Err::<u32, _>("") }).await);
	assert_eq!(
		slot.state(),
		TabState::Failure {
			message: "An error occurred".to_owned(),
			stale: Some(3)
		}
	);
}
