use thiserror::Error;

/// Errors raised while bringing a service up.
///
/// Request-time failures are modelled by each service's own error type;
/// this one only covers configuration and process setup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn config(msg: impl std::fmt::Display) -> Self {
        AppError::ConfigError(anyhow::anyhow!("{}", msg))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}
