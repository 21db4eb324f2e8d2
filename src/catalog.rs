//! Fixed set of simulated failures.
//!
//! The status code and the body are drawn independently, so a `502` may well
//! carry a body that reads like a validation error. The details imitate
//! bodies returned by real third-party postback integrations.

use axum::http::StatusCode;
use rand::{seq::SliceRandom, Rng};

/// Status codes a simulated failure can carry.
pub const ERROR_STATUS_CODES: [StatusCode; 5] = [
    StatusCode::BAD_REQUEST,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Bodies a simulated failure can carry.
pub const ERROR_DETAILS: [&str; 19] = [
    "Event postback is disabled due to Facebook re-engagement being enabled",
    r#"PostbackTypeNotSupported: Integration doesn't support this Postback type ("session"). Please contact your Kochava Account Management team."#,
    "",
    r#"{"error":{"message":"(#100) At least one of the parameter 'attribution', 'advertiser_id', 'anon_id', 'page_scoped_user_id', 'user_id_type' or 'ud' is required for the 'custom_app_e"#,
    r#"{"error":{"message":"(#4) Application request limit reached","type":"OAuthException","is_transient":true,"code":4,""#,
    r#"{"status":400,"error":"Bad Request","errors":[{"codes":["typeMismatch.postBackBean.ctawindow","typeMismatch.ctawindow","typeMismatch.java"#,
    "Empty device id.",
    "Error: Doubleclick only supports adid and idfa identifiers, neither found.",
    r#"{"num_events_processed":1,"num_events_received":1,"events":[{"status":"processed","error_message":"","warning_message":""}]}"#,
    "Error: Is Not Allowed Network, Apple Ads",
    r#"PostbackTypeNotSupported: Integration doesn't support this Postback type ("click"). Please contact your Kochava Account Management team."#,
    "Missing delivery URL",
    r#""EventTypeNotSupported: Integration doesn't support the Event type: "". Please contact your Kochava Account Management team.""#,
    "Error: Invalid postback type: event",
    r#"{"errors":["no IDFA, GAID, or GUM data found"],"warnings":[]}"#,
    r#"{"statusCode":422,"success":false}"#,
    "Error: getaddrinfo ENOTFOUND odm-postback.pinsightmedia.com odm-postback.pinsightmedia.com:443",
    r#"{"errors":["The request doesn't contain any event"],"warnings":[]}"#,
    "user_id Decryption Failed",
];

/// A status and body picked from an [`ErrorCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedError {
    pub status: StatusCode,
    pub detail: &'static str,
}

/// Two candidate lists sampled independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCatalog {
    statuses: &'static [StatusCode],
    details: &'static [&'static str],
}

impl ErrorCatalog {
    /// Create a catalog from custom candidate lists.
    ///
    /// Returns `None` if either list is empty or if a status is not a client
    /// or server error.
    pub fn new(statuses: &'static [StatusCode], details: &'static [&'static str]) -> Option<Self> {
        let valid = !statuses.is_empty()
            && !details.is_empty()
            && statuses
                .iter()
                .all(|status| status.is_client_error() || status.is_server_error());

        valid.then_some(ErrorCatalog { statuses, details })
    }

    pub fn statuses(&self) -> &'static [StatusCode] {
        self.statuses
    }

    pub fn details(&self) -> &'static [&'static str] {
        self.details
    }

    /// Draw a status, then a detail, uniformly and independently.
    pub fn pick<G: Rng + ?Sized>(&self, rng: &mut G) -> SimulatedError {
        // Both lists are non-empty by construction.
        let status = self
            .statuses
            .choose(rng)
            .copied()
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let detail = self.details.choose(rng).copied().unwrap_or_default();

        SimulatedError { status, detail }
    }
}

impl Default for ErrorCatalog {
    fn default() -> Self {
        ErrorCatalog {
            statuses: &ERROR_STATUS_CODES,
            details: &ERROR_DETAILS,
        }
    }
}
