use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failures that stop the application: bad configuration at start-up or a
/// terminal that can no longer be driven. Everything else is reported in a
/// toast and recovered from.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid setting {key}: {message}")]
    Setting { key: &'static str, message: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
}
