//! Random success and failure for HTTP clients
//!
//! This crate provides a catch-all HTTP service that answers every request
//! with either a canned JSON success or a simulated error, picked at random
//! per request. Point a client at it to exercise retries, error handling and
//! observability without a real backend.
//!
//! ## Services
//!
//! * [`Responder`](responder/struct.Responder.html) - answers any request with a success or a random error.
//! * [`RequestLogLayer`](logging/struct.RequestLogLayer.html) - logs method, path, status and timing of every request.
//!
//! ## Example
//!
//! ```rust
//! use random_server::{decider::ErrorRate, logging::RequestLogLayer, responder::Responder};
//! use tower::ServiceBuilder;
//!
//! // Answer 30% of the requests with a simulated error.
//! let rate = ErrorRate::new(0.3).unwrap();
//!
//! let service = ServiceBuilder::new()
//!     .layer(RequestLogLayer::new())
//!     .service(Responder::new(rate));
//! ```
//!
//! ## Custom failures
//!
//! The built-in [`ErrorCatalog`](catalog/struct.ErrorCatalog.html) imitates
//! third-party integration errors. Swap in your own status codes and bodies
//! with [`ErrorCatalog::new`](catalog/struct.ErrorCatalog.html#method.new) and
//! [`Responder::catalog`](responder/struct.Responder.html#method.catalog):
//!
//! ```rust
//! use axum::http::StatusCode;
//! use random_server::{catalog::ErrorCatalog, decider::ErrorRate, responder::Responder};
//!
//! static STATUSES: [StatusCode; 1] = [StatusCode::TOO_MANY_REQUESTS];
//! static DETAILS: [&str; 1] = ["slow down"];
//!
//! let catalog = ErrorCatalog::new(&STATUSES, &DETAILS).unwrap();
//! let responder = Responder::new(ErrorRate::ALWAYS).catalog(catalog);
//! ```
//!
//! `demos/axum.rs` serves such a responder (`cargo run --example axum`).

pub mod catalog;
pub mod decider;
pub mod error;
pub mod logging;
pub mod problem;
pub mod responder;
pub mod server;
pub mod settings;
pub mod telemetry;

#[cfg(test)]
mod test_utils;
