use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors talking to the chain.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("rpc call {call} failed: {reason}")]
    Rpc { call: &'static str, reason: String },

    #[error("contract call {call} failed: {reason}")]
    Contract { call: &'static str, reason: String },

    #[error("rpc call {call} timed out after {after_ms}ms")]
    Timeout { call: &'static str, after_ms: u64 },
}

/// Scan cursor persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cursor file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cursor file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the error is a chain/RPC failure that the next pass may not repeat.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Chain(_) | Error::Store(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
