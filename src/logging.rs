//! # Request logging for `tower`
//!
//! Layer that records one [`RequestLogEntry`] for every request served by the
//! inner service, once the response is known. The status in the entry is the
//! status of the response handed back to the client; a service that never
//! touches it reports `200`, the default of [`Response`].
//!
//! ## Usage
//!
//! ```rust
//! use random_server::logging::{RequestLogEntry, RequestLogLayer};
//! use tower::{service_fn, ServiceBuilder};
//! use axum::{body::Body, http::{Request, Response}};
//! # async fn my_service(_req: Request<Body>) -> Result<Response<Body>, std::convert::Infallible> {
//! #     Ok(Response::new(Body::empty()))
//! # }
//!
//! // Emit entries as `tracing` events.
//! let service = ServiceBuilder::new()
//!     .layer(RequestLogLayer::new())
//!     .service_fn(my_service);
//!
//! // Or hand them to a closure.
//! let service = ServiceBuilder::new()
//!     .layer(RequestLogLayer::with_sink(|entry: &RequestLogEntry| {
//!         println!("{} {} -> {}", entry.method, entry.path, entry.status);
//!     }))
//!     .service_fn(my_service);
//! ```

use axum::{
    extract::ConnectInfo,
    http::{header, Method, Request, Response, StatusCode},
};
use std::{
    future::Future,
    net::SocketAddr,
    pin::Pin,
    task::{Context, Poll},
    time::{Duration, Instant},
};
use tower::{Layer, Service};

use crate::telemetry;

/// One served request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLogEntry {
    pub method: Method,
    pub path: String,
    /// Raw query string, empty if there is none.
    pub query: String,
    pub status: StatusCode,
    pub duration: Duration,
    pub user_agent: String,
    /// Peer address, empty when the server did not provide connection info.
    pub remote_addr: String,
}

/// Destination of request log entries.
///
/// Recording must not fail; a sink that cannot deliver an entry drops it.
pub trait LogSink {
    fn record(&self, entry: &RequestLogEntry);
}

/// Emits entries as `tracing` events and updates request metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record(&self, entry: &RequestLogEntry) {
        tracing::info!(
            method = %entry.method,
            path = %entry.path,
            query = %entry.query,
            status = entry.status.as_u16(),
            duration = ?entry.duration,
            user_agent = %entry.user_agent,
            remote_addr = %entry.remote_addr,
            "HTTP request"
        );
        telemetry::record_request(entry);
    }
}

impl<F> LogSink for F
where
    F: Fn(&RequestLogEntry),
{
    fn record(&self, entry: &RequestLogEntry) {
        self(entry)
    }
}

/// A layer that logs every request served by the wrapped service.
#[derive(Debug, Clone, Default)]
pub struct RequestLogLayer<K = TracingSink> {
    sink: K,
}

impl RequestLogLayer {
    /// Create a new `RequestLogLayer` that logs through `tracing`.
    pub fn new() -> Self {
        RequestLogLayer { sink: TracingSink }
    }
}

impl<K> RequestLogLayer<K> {
    /// Create a new `RequestLogLayer` that hands entries to `sink`.
    pub fn with_sink(sink: K) -> Self {
        RequestLogLayer { sink }
    }
}

impl<S, K> Layer<S> for RequestLogLayer<K>
where
    K: Clone,
{
    type Service = RequestLogService<S, K>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestLogService {
            inner,
            sink: self.sink.clone(),
        }
    }
}

/// Underlying service for the `RequestLogLayer`
#[derive(Debug, Clone)]
pub struct RequestLogService<S, K> {
    inner: S,
    sink: K,
}

impl<S, K, ReqBody, ResBody> Service<Request<ReqBody>> for RequestLogService<S, K>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
    K: LogSink + Clone + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = LogFuture<S::Response, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let pending = PendingEntry::from_request(&request);
        let sink = self.sink.clone();

        let fut = self.inner.call(request);
        Box::pin(async move {
            let response = fut.await?;
            sink.record(&pending.finish(response.status(), start.elapsed()));
            Ok(response)
        })
    }
}

type LogFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Request fields captured before the request moves into the inner service.
struct PendingEntry {
    method: Method,
    path: String,
    query: String,
    user_agent: String,
    remote_addr: String,
}

impl PendingEntry {
    fn from_request<B>(request: &Request<B>) -> Self {
        let user_agent = request
            .headers()
            .get(header::USER_AGENT)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .unwrap_or_default();
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();

        PendingEntry {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            query: request.uri().query().unwrap_or_default().to_string(),
            user_agent,
            remote_addr,
        }
    }

    fn finish(self, status: StatusCode, duration: Duration) -> RequestLogEntry {
        RequestLogEntry {
            method: self.method,
            path: self.path,
            query: self.query,
            status,
            duration,
            user_agent: self.user_agent,
            remote_addr: self.remote_addr,
        }
    }
}
