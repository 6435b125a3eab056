use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Rules error: {0}")]
    Rules(String),

    #[error("Usage: {0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

