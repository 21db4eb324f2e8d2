//! Process settings.
//!
//! Settings come from `RANDOM_SERVER_*` environment variables laid over the
//! defaults below, e.g. `RANDOM_SERVER_RANDOM_ERROR_RATE=0.2`. The bare
//! `LOG_LEVEL` variable is honoured when `RANDOM_SERVER_LOG_LEVEL` is unset.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use crate::{decider::ErrorRate, error::ConfigError};

/// Prefix of every environment variable read by [`Settings::load`].
pub const ENV_PREFIX: &str = "RANDOM_SERVER";

/// Unprefixed log level variable, below `RANDOM_SERVER_LOG_LEVEL`.
pub const FALLBACK_LOG_LEVEL: &str = "LOG_LEVEL";

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Probability that a request is answered with a simulated error.
    pub random_error_rate: f64,

    /// HTTP bind address.
    pub listen_address: String,

    /// Default log level, overridden by `RUST_LOG`.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Serve Prometheus metrics on `metrics_port`.
    pub metrics_enabled: bool,

    pub metrics_port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            random_error_rate: 0.0,
            listen_address: "0.0.0.0:8080".to_string(),
            log_level: "error".to_string(),
            log_format: LogFormat::Json,
            metrics_enabled: false,
            metrics_port: 8081,
        }
    }
}

impl Settings {
    /// Load and validate settings from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(environment(), std::env::var(FALLBACK_LOG_LEVEL).ok())
    }

    /// Load and validate settings from the given environment source.
    ///
    /// `log_level` takes the place of the built-in default level.
    pub fn load_from(
        env: config::Environment,
        log_level: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(level) = log_level {
            builder = builder.set_default("log_level", level)?;
        }

        let settings: Settings = builder
            .add_source(env)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Check value ranges and cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.error_rate()?;

        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))?;

        let addr = self.listen_addr()?;
        if self.metrics_enabled && addr.port() == self.metrics_port {
            return Err(ConfigError::PortConflict(self.metrics_port));
        }

        Ok(())
    }

    pub fn error_rate(&self) -> Result<ErrorRate, ConfigError> {
        ErrorRate::new(self.random_error_rate)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_address
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddress(self.listen_address.clone()))
    }
}

/// Environment source for `RANDOM_SERVER_*` variables.
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(vars: &[(&str, &str)]) -> config::Environment {
        let source = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        environment().source(Some(source))
    }

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        Settings::load_from(source(vars), None)
    }

    #[test]
    fn defaults() {
        let settings = load(&[]).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.error_rate().unwrap(), ErrorRate::NEVER);
        assert_eq!(settings.listen_addr().unwrap().port(), 8080);
    }

    #[test]
    fn from_environment() {
        let settings = load(&[
            ("RANDOM_SERVER_RANDOM_ERROR_RATE", "0.25"),
            ("RANDOM_SERVER_LISTEN_ADDRESS", "127.0.0.1:9000"),
            ("RANDOM_SERVER_LOG_LEVEL", "debug"),
            ("RANDOM_SERVER_LOG_FORMAT", "pretty"),
            ("RANDOM_SERVER_METRICS_ENABLED", "true"),
            ("RANDOM_SERVER_METRICS_PORT", "9100"),
        ])
        .unwrap();

        assert_eq!(settings.random_error_rate, 0.25);
        assert_eq!(settings.listen_address, "127.0.0.1:9000");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert!(settings.metrics_enabled);
        assert_eq!(settings.metrics_port, 9100);
    }

    #[test]
    fn ignores_other_prefixes() {
        let settings = load(&[("OTHER_RANDOM_ERROR_RATE", "0.5")]).unwrap();
        assert_eq!(settings.random_error_rate, 0.0);
    }

    #[test]
    fn fallback_log_level() {
        let settings = Settings::load_from(source(&[]), Some("info".to_string())).unwrap();
        assert_eq!(settings.log_level, "info");

        // The prefixed variable wins.
        let settings = Settings::load_from(
            source(&[("RANDOM_SERVER_LOG_LEVEL", "warn")]),
            Some("info".to_string()),
        )
        .unwrap();
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn invalid_fallback_log_level() {
        let err = Settings::load_from(source(&[]), Some("chatty".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(level) if level == "chatty"));
    }

    #[test]
    fn invalid_error_rate() {
        let err = load(&[("RANDOM_SERVER_RANDOM_ERROR_RATE", "1.5")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidErrorRate(rate) if rate == 1.5));
    }

    #[test]
    fn invalid_log_level() {
        let err = load(&[("RANDOM_SERVER_LOG_LEVEL", "loud")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }

    #[test]
    fn invalid_log_format() {
        let err = load(&[("RANDOM_SERVER_LOG_FORMAT", "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn invalid_listen_address() {
        let err = load(&[("RANDOM_SERVER_LISTEN_ADDRESS", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidListenAddress(_)));
    }

    #[test]
    fn metrics_port_conflict() {
        let settings = Settings {
            metrics_enabled: true,
            metrics_port: 8080,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::PortConflict(8080))
        ));

        // Only checked when metrics are served.
        let settings = Settings {
            metrics_enabled: false,
            ..settings
        };
        assert!(settings.validate().is_ok());
    }
}
