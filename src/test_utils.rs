//! Utilities for testing this crate

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use std::{
    future::{ready, Ready},
    sync::{Arc, Mutex},
    task::{Context, Poll},
};
use tower::Service;

use crate::logging::RequestLogEntry;

/// Answers `ok` without ever setting a status.
#[derive(Clone)]
pub struct DummyService;

impl Service<Request<Body>> for DummyService {
    type Response = Response<Body>;
    type Error = &'static str;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _request: Request<Body>) -> Self::Future {
        ready(Ok(Response::new(Body::from("ok"))))
    }
}

/// Answers with a fixed status and an empty body.
#[derive(Clone)]
pub struct StatusService(pub StatusCode);

impl Service<Request<Body>> for StatusService {
    type Response = Response<Body>;
    type Error = &'static str;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _request: Request<Body>) -> Self::Future {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = self.0;
        ready(Ok(response))
    }
}

/// Never produces a response.
#[derive(Clone)]
pub struct FailingService;

impl Service<Request<Body>> for FailingService {
    type Response = Response<Body>;
    type Error = &'static str;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _request: Request<Body>) -> Self::Future {
        ready(Err("unavailable"))
    }
}

pub type Entries = Arc<Mutex<Vec<RequestLogEntry>>>;

/// Log sink that keeps every entry it receives.
pub fn collecting_sink() -> (impl Fn(&RequestLogEntry) + Clone + Send + Sync + 'static, Entries) {
    let entries = Entries::default();
    let sink = {
        let entries = Arc::clone(&entries);
        move |entry: &RequestLogEntry| entries.lock().unwrap().push(entry.clone())
    };

    (sink, entries)
}
