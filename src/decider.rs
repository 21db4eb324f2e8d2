//! # Decider
//!
//! This module contains the [`Decider`] trait, which decides if a request
//! should be answered with a simulated error. It adds a `decide` method that
//! draws from the random number generator it is given.
//!
//! [`ErrorRate`] is the decider used by the server: a validated probability
//! between 0 and 1. `bool` is also a decider, for "always" and "never".
//!
//! ## Example
//!
//! ```rust
//! use random_server::decider::{Decider, ErrorRate};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! // Always.
//! assert!(true.decide(&mut rng));
//!
//! // Never.
//! assert!(!ErrorRate::NEVER.decide(&mut rng));
//!
//! // 30% of the time.
//! let decision = ErrorRate::new(0.3).unwrap().decide(&mut rng);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Trait for deciding if a request should fail.
pub trait Decider {
    /// Decide if the current request should be answered with an error.
    fn decide<G: Rng + ?Sized>(&self, rng: &mut G) -> bool;
}

impl Decider for bool {
    fn decide<G: Rng + ?Sized>(&self, _rng: &mut G) -> bool {
        *self
    }
}

/// Probability that a request is answered with a simulated error.
///
/// Always within `[0, 1]`; the constructor rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct ErrorRate(f64);

impl ErrorRate {
    /// Every request succeeds.
    pub const NEVER: ErrorRate = ErrorRate(0.0);
    /// Every request fails.
    pub const ALWAYS: ErrorRate = ErrorRate(1.0);

    /// Create a new `ErrorRate`, bound between 0 and 1.
    pub fn new(probability: f64) -> Result<Self, ConfigError> {
        if (0.0..=1.0).contains(&probability) {
            Ok(ErrorRate(probability))
        } else {
            Err(ConfigError::InvalidErrorRate(probability))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for ErrorRate {
    fn default() -> Self {
        ErrorRate::NEVER
    }
}

impl TryFrom<f64> for ErrorRate {
    type Error = ConfigError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        ErrorRate::new(value)
    }
}

impl From<ErrorRate> for f64 {
    fn from(rate: ErrorRate) -> Self {
        rate.0
    }
}

impl Decider for ErrorRate {
    fn decide<G: Rng + ?Sized>(&self, rng: &mut G) -> bool {
        // `gen` draws from [0, 1), so a rate of 1.0 always fails and 0.0 never does.
        rng.gen::<f64>() < self.0
    }
}
