use thiserror::Error;

/// Errors raised while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid error rate {0}: must be between 0 and 1")]
    InvalidErrorRate(f64),

    #[error("invalid log level {0:?}")]
    InvalidLogLevel(String),

    #[error("invalid listen address {0:?}")]
    InvalidListenAddress(String),

    #[error("metrics port {0} is already used by the HTTP listener")]
    PortConflict(u16),
}

/// Errors that stop the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot initialize logging: {0}")]
    Logging(String),

    #[cfg(feature = "prometheus")]
    #[error("cannot install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}
