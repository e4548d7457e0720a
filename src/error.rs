use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown detail level: {0} (expected tables, pk or all)")]
    UnknownDetail(String),

    #[error("Table listed more than once: {0}")]
    DuplicateTable(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
