//! # Mock Client & Testing Guide
//!
//! [`MockClient`] implements the same [`Client`] trait as the HTTP transport but
//! serves canned responses from memory. It lets you script a Redfish service
//! URI by URI, then assert what was requested and that every response body was
//! released.
//!
//! ## When to use the Mock vs a real server
//!
//! | Feature | MockClient | HttpClient + `mockito` |
//! |---------|------------|------------------------|
//! | **Speed** | Instant (in-memory) | Fast (loopback socket) |
//! | **Body release tracking** | Yes (`open_bodies`) | No |
//! | **Concurrency tracking** | Yes (`max_in_flight`) | No |
//! | **Use Case** | Decoder and resolver logic | The transport itself |
//!
//! ## Example
//!
//! ```rust
//! use redfish_framework::mock::MockClient;
//! use redfish_framework::TransportError;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::new();
//!     mock.expect_get("/redfish/v1/Systems/1")
//!         .return_json(json!({ "Id": "1", "Name": "System" }));
//!     mock.expect_get("/redfish/v1/Systems/2").return_status(500, json!({
//!         "error": { "code": "Base.1.0.GeneralError", "message": "internal error" }
//!     }));
//!
//!     let client = mock.handle();
//!     assert!(client.get("/redfish/v1/Systems/1").await.is_ok());
//!     assert!(matches!(
//!         client.get("/redfish/v1/Systems/2").await,
//!         Err(TransportError::Status { status: 500, .. })
//!     ));
//!
//!     // Every expectation was hit at least once.
//!     mock.verify();
//! }
//! ```
//!
//! Requests for a URI with no expectation answer `404 Not Found`, like a BMC would.

use crate::client::{Body, Client, ClientHandle, Response};
use crate::error::{status_message, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, ReadBuf};

/// What a scripted URI answers with.
#[derive(Clone)]
enum Reply {
    Body { status: u16, bytes: Vec<u8> },
    BrokenBody,
    Fail(TransportError),
}

#[derive(Clone)]
struct Expectation {
    reply: Reply,
    delay: Option<Duration>,
    hits: usize,
}

#[derive(Default)]
struct MockState {
    expectations: HashMap<String, Expectation>,
    requests: Vec<String>,
}

#[derive(Default)]
struct Counters {
    open_bodies: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// In-memory [`Client`] with per-URI expectations.
///
/// Clones share state, so a clone handed to the code under test can be
/// inspected through the original.
#[derive(Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
    counters: Arc<Counters>,
}

impl MockClient {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a shared handle for use as a resource client.
    pub fn handle(&self) -> ClientHandle {
        Arc::new(self.clone())
    }

    /// Expects a `GET` of `uri`. The reply is served every time the URI is requested.
    pub fn expect_get(&mut self, uri: impl Into<String>) -> GetExpectationBuilder {
        GetExpectationBuilder {
            uri: uri.into(),
            delay: None,
            state: self.state.clone(),
        }
    }

    /// Every URI requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().unwrap().requests.len()
    }

    /// Number of times `uri` was requested.
    pub fn requests_for(&self, uri: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.as_str() == uri)
            .count()
    }

    /// Bodies handed out and not yet dropped.
    pub fn open_bodies(&self) -> usize {
        self.counters.open_bodies.load(Ordering::SeqCst)
    }

    /// Highest number of requests observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.counters.max_in_flight.load(Ordering::SeqCst)
    }

    /// Verifies that every expectation was requested at least once.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        let mut missed: Vec<&String> = state
            .expectations
            .iter()
            .filter(|(_, exp)| exp.hits == 0)
            .map(|(uri, _)| uri)
            .collect();
        if !missed.is_empty() {
            missed.sort();
            panic!("Not all expectations were met. Never requested: {:?}", missed);
        }
    }

    fn tracked_body(&self, reader: impl AsyncRead + Send + Unpin + 'static) -> Body {
        self.counters.open_bodies.fetch_add(1, Ordering::SeqCst);
        Body::new(TrackedReader {
            inner: Box::new(reader),
            counters: self.counters.clone(),
        })
    }
}

#[async_trait]
impl Client for MockClient {
    async fn get(&self, uri: &str) -> Result<Response, TransportError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(uri.to_string());
            state.expectations.get_mut(uri).map(|exp| {
                exp.hits += 1;
                exp.clone()
            })
        }; // Release lock before awaiting

        let in_flight = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters
            .max_in_flight
            .fetch_max(in_flight, Ordering::SeqCst);

        if let Some(delay) = expectation.as_ref().and_then(|exp| exp.delay) {
            tokio::time::sleep(delay).await;
        }
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);

        let Some(expectation) = expectation else {
            return Err(TransportError::Status {
                uri: uri.to_string(),
                status: 404,
                message: "Not Found".to_string(),
            });
        };

        match expectation.reply {
            Reply::Body { status, bytes } if (200..300).contains(&status) => Ok(Response::new(
                status,
                self.tracked_body(Cursor::new(bytes)),
            )),
            Reply::Body { status, bytes } => Err(TransportError::Status {
                uri: uri.to_string(),
                status,
                message: status_message(status, &bytes),
            }),
            Reply::BrokenBody => Ok(Response::new(200, self.tracked_body(BrokenReader))),
            Reply::Fail(e) => Err(e),
        }
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder {
    uri: String,
    delay: Option<Duration>,
    state: Arc<Mutex<MockState>>,
}

impl GetExpectationBuilder {
    /// Holds the response back for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answers `200 OK` with `value` serialized as the body.
    pub fn return_json(self, value: serde_json::Value) {
        self.return_body(value.to_string());
    }

    /// Answers `200 OK` with a raw body, which need not be valid JSON.
    pub fn return_body(self, body: impl Into<Vec<u8>>) {
        self.push(Reply::Body {
            status: 200,
            bytes: body.into(),
        });
    }

    /// Answers with `status` and `value` as the body.
    pub fn return_status(self, status: u16, value: serde_json::Value) {
        self.push(Reply::Body {
            status,
            bytes: value.to_string().into_bytes(),
        });
    }

    /// Answers `200 OK` with a body stream that fails when read.
    pub fn return_broken_body(self) {
        self.push(Reply::BrokenBody);
    }

    /// Fails the request with `error`.
    pub fn return_err(self, error: TransportError) {
        self.push(Reply::Fail(error));
    }

    fn push(self, reply: Reply) {
        let mut state = self.state.lock().unwrap();
        state.expectations.insert(
            self.uri,
            Expectation {
                reply,
                delay: self.delay,
                hits: 0,
            },
        );
    }
}

struct TrackedReader {
    inner: Box<dyn AsyncRead + Send + Unpin>,
    counters: Arc<Counters>,
}

impl AsyncRead for TrackedReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl Drop for TrackedReader {
    fn drop(&mut self) {
        self.counters.open_bodies.fetch_sub(1, Ordering::SeqCst);
    }
}

struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(
            io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        )))
    }
}
