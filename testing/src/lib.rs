//! # Salon Booking Testing
//!
//! Testing utilities for the booking wizards.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`FixedClock`] / [`test_clock`]: deterministic time
//! - [`MockHttpClient`]: a scripted [`HttpCollaborator`](salon_booking_client::HttpCollaborator)
//!   that records every request
//!
//! ## Example
//!
//! ```ignore
//! use salon_booking_testing::{MockHttpClient, test_clock};
//!
//! #[tokio::test]
//! async fn submit_appointment() {
//!     let http = MockHttpClient::new()
//!         .on_post("/appointments", Ok(json!({"code": "0", "msg": "ok", "data": {"bookingId": "b-1"}})));
//!     let env = BookingEnvironment::new(SalonApi::new(Arc::new(http)), Arc::new(test_clock()));
//!     // ...
//! }
//! ```

use chrono::{DateTime, Utc};
use salon_booking_core::environment::Clock;

pub mod reducer_test;

pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of environment dependencies
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use salon_booking_client::{HttpCollaborator, HttpError, HttpFuture};
    use serde_json::{Value, json};
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use salon_booking_testing::mocks::FixedClock;
    /// use salon_booking_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }

    /// HTTP method of a recorded request
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum MockMethod {
        /// `GET`
        Get,
        /// `POST`
        Post,
    }

    /// A request seen by [`MockHttpClient`]
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        /// Method
        pub method: MockMethod,
        /// Path as passed by the caller
        pub path: String,
        /// JSON body for `POST`
        pub body: Option<Value>,
    }

    type Scripted = Result<Value, HttpError>;

    #[derive(Default)]
    struct MockState {
        routes: HashMap<(MockMethod, String), VecDeque<Scripted>>,
        requests: Vec<RecordedRequest>,
    }

    /// Scripted HTTP collaborator
    ///
    /// Responses are queued per `(method, path)`. The last queued response
    /// for a route is sticky and answers every further call. Unscripted
    /// routes answer with a 404 status error.
    #[derive(Clone, Default)]
    pub struct MockHttpClient {
        state: Arc<Mutex<MockState>>,
    }

    impl MockHttpClient {
        /// An empty script
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for `GET path`
        #[must_use]
        pub fn on_get(self, path: impl Into<String>, response: Scripted) -> Self {
            self.push(MockMethod::Get, path.into(), response);
            self
        }

        /// Queue a response for `POST path`
        #[must_use]
        pub fn on_post(self, path: impl Into<String>, response: Scripted) -> Self {
            self.push(MockMethod::Post, path.into(), response);
            self
        }

        /// Every request received so far, in order
        #[must_use]
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.lock().requests.clone()
        }

        /// Number of requests received for a route
        #[must_use]
        pub fn calls_to(&self, method: MockMethod, path: &str) -> usize {
            self.lock()
                .requests
                .iter()
                .filter(|r| r.method == method && r.path == path)
                .count()
        }

        fn push(&self, method: MockMethod, path: String, response: Scripted) {
            self.lock()
                .routes
                .entry((method, path))
                .or_default()
                .push_back(response);
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }

        fn respond(&self, method: MockMethod, path: &str, body: Option<Value>) -> HttpFuture {
            let response = {
                let mut state = self.lock();
                state.requests.push(RecordedRequest {
                    method,
                    path: path.to_string(),
                    body,
                });

                match state.routes.get_mut(&(method, path.to_string())) {
                    Some(queue) if queue.len() > 1 => queue.pop_front(),
                    Some(queue) => queue.front().cloned(),
                    None => None,
                }
            };

            let response = response.unwrap_or_else(|| {
                Err(HttpError::Status {
                    status: 404,
                    body: json!({ "message": format!("No mock for {method:?} {path}") }),
                })
            });

            Box::pin(async move { response })
        }
    }

    impl HttpCollaborator for MockHttpClient {
        fn get(&self, path: &str) -> HttpFuture {
            self.respond(MockMethod::Get, path, None)
        }

        fn post(&self, path: &str, body: Value) -> HttpFuture {
            self.respond(MockMethod::Post, path, Some(body))
        }
    }
}

/// Build a successful `{code: "0", msg: "ok", data}` body
#[must_use]
pub fn ok_envelope(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({ "code": "0", "msg": "ok", "data": data })
}

/// Build a failed envelope body
#[must_use]
pub fn error_envelope(code: &str, msg: &str) -> serde_json::Value {
    serde_json::json!({ "code": code, "msg": msg, "data": null })
}

/// Install a test-friendly tracing subscriber (safe to call repeatedly)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedClock, MockHttpClient, MockMethod, RecordedRequest, test_clock};
