//! # Catch-all responder
//!
//! [`Responder`] is a [`tower::Service`] that answers every request without
//! looking at it. With the probability given by its [`Decider`] it returns a
//! simulated failure picked from an [`ErrorCatalog`]; otherwise it returns
//! `200 OK` with a small JSON payload.
//!
//! ## Usage
//!
//! ```rust
//! use random_server::{decider::ErrorRate, responder::Responder};
//! use rand::rngs::mock::StepRng;
//!
//! // Fail 10% of the requests.
//! let responder = Responder::new(ErrorRate::new(0.1).unwrap());
//!
//! // Deterministic draws for tests.
//! let responder = Responder::with_rng(ErrorRate::ALWAYS, StepRng::new(0, 0));
//! ```

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;
use std::{
    convert::Infallible,
    future::{ready, Ready},
    sync::{Arc, Mutex, PoisonError},
    task::{Context, Poll},
};
use tower::Service;

use crate::{
    catalog::{ErrorCatalog, SimulatedError},
    decider::{Decider, ErrorRate},
    problem::ProblemDetails,
};

/// Message carried by every successful response.
pub const SUCCESS_MESSAGE: &str = "request processed successfully";

/// Body of a successful response.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessPayload {
    pub message: &'static str,
}

impl Default for SuccessPayload {
    fn default() -> Self {
        SuccessPayload {
            message: SUCCESS_MESSAGE,
        }
    }
}

/// What a single request gets answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure(SimulatedError),
}

/// Service that answers any request with a success or a simulated error.
///
/// The random number generator is shared between clones, so a router that
/// clones the service for every request keeps drawing from a single stream.
#[derive(Debug)]
pub struct Responder<D = ErrorRate, R = StdRng> {
    decider: D,
    catalog: ErrorCatalog,
    rng: Arc<Mutex<R>>,
}

impl<D: Clone, R> Clone for Responder<D, R> {
    fn clone(&self) -> Self {
        Responder {
            decider: self.decider.clone(),
            catalog: self.catalog,
            rng: Arc::clone(&self.rng),
        }
    }
}

impl<D> Responder<D, StdRng> {
    /// Create a new `Responder` with a generator seeded from the OS.
    pub fn new(decider: D) -> Self {
        Responder::with_rng(decider, StdRng::from_entropy())
    }
}

impl<D, R> Responder<D, R> {
    /// Create a new `Responder` drawing from the given generator.
    pub fn with_rng(decider: D, rng: R) -> Self {
        Responder {
            decider,
            catalog: ErrorCatalog::default(),
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Replace the default catalog of simulated failures.
    pub fn catalog(mut self, catalog: ErrorCatalog) -> Self {
        self.catalog = catalog;
        self
    }
}

impl<D, R> Responder<D, R>
where
    D: Decider,
    R: Rng,
{
    /// Draw the outcome for one request.
    pub fn decide(&self) -> Outcome {
        // A panic while holding the lock cannot leave the generator half-updated.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        if self.decider.decide(&mut *rng) {
            Outcome::Failure(self.catalog.pick(&mut *rng))
        } else {
            Outcome::Success
        }
    }

    /// Draw an outcome and render it. `path` ends up in problem details.
    pub fn respond(&self, path: &str) -> Response {
        match self.decide() {
            Outcome::Failure(error) => failure_response(error),
            Outcome::Success => success_response(&SuccessPayload::default(), path),
        }
    }
}

impl<D, R, B> Service<Request<B>> for Responder<D, R>
where
    D: Decider,
    R: Rng,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Ready<Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<B>) -> Self::Future {
        ready(Ok(self.respond(request.uri().path())))
    }
}

/// Raw catalog body, no content type.
fn failure_response(error: SimulatedError) -> Response {
    let mut response = Response::new(Body::from(error.detail));
    *response.status_mut() = error.status;
    response
}

fn success_response<T: Serialize>(payload: &T, path: &str) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(err) => {
            tracing::warn!(error = %err, path, "could not encode success payload");
            ProblemDetails::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "json encoding error",
                err.to_string(),
                path,
            )
            .into_response()
        }
    }
}
