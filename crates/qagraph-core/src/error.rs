use thiserror::Error;

/// Top-level error type shared by qagraph crates.
#[derive(Error, Debug)]
pub enum QaGraphError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}
