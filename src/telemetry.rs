//! Log subscriber and metrics setup.
//!
//! # Metrics
//! - `http_server_requests_total` (counter): requests by method and status
//! - `http_server_request_duration_seconds` (histogram): time to produce the response
//!
//! Methods outside the standard set share the `_OTHER` label, so junk traffic
//! cannot grow the number of series.
//!
//! Without an installed recorder the metric calls are no-ops.

use axum::http::Method;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    error::ServerError,
    logging::RequestLogEntry,
    settings::{LogFormat, Settings},
};

pub const REQUESTS_TOTAL: &str = "http_server_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_server_request_duration_seconds";

/// Label for any method that is not one of the standard ones.
pub const OTHER_METHOD: &str = "_OTHER";

/// Install the global log subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(settings: &Settings) -> Result<(), ServerError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let result = match settings.log_format {
        LogFormat::Json => fmt().json().with_env_filter(filter).try_init(),
        LogFormat::Pretty => fmt().pretty().with_env_filter(filter).try_init(),
    };

    result.map_err(|err| ServerError::Logging(err.to_string()))
}

/// Serve Prometheus metrics on `metrics_port` if enabled.
#[cfg(feature = "prometheus")]
#[cfg_attr(docsrs, doc(cfg(feature = "prometheus")))]
pub fn init_metrics(settings: &Settings) -> Result<(), ServerError> {
    if !settings.metrics_enabled {
        return Ok(());
    }

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], settings.metrics_port));
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(address = %addr, "metrics exporter listening");
    Ok(())
}

#[cfg(not(feature = "prometheus"))]
pub fn init_metrics(settings: &Settings) -> Result<(), ServerError> {
    if settings.metrics_enabled {
        tracing::warn!("metrics requested but the prometheus feature is disabled");
    }
    Ok(())
}

static STANDARD_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::CONNECT,
    Method::OPTIONS,
    Method::TRACE,
    Method::PATCH,
];

/// Bounded `method` label.
pub fn method_label(method: &Method) -> &'static str {
    STANDARD_METHODS
        .iter()
        .find(|standard| *standard == method)
        .map_or(OTHER_METHOD, Method::as_str)
}

/// Count and time one served request.
pub fn record_request(entry: &RequestLogEntry) {
    let method = method_label(&entry.method);
    let status = entry.status.as_u16().to_string();

    metrics::counter!(REQUESTS_TOTAL, "method" => method, "status" => status.clone())
        .increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS, "method" => method, "status" => status)
        .record(entry.duration.as_secs_f64());
}
