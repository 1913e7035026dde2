//! Error hierarchy shared by the Meteomar crates.
//!
//! Each enum carries a technical `Display` for logs and a short
//! `user_message()` for the terminal.

use thiserror::Error;

/// What the binary reports when a command fails.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Dashboard command failures (unknown location, nothing to export)
    #[error("Weather error: {0}")]
    Weather(String),

    #[error("{0:#}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Storage(e) => e.user_message(),
            AppError::Weather(_) => {
                "That request could not be completed. Run with --help for usage."
            }
            AppError::Other(_) => "Something went wrong. Run with RUST_LOG=debug for details.",
        }
    }
}

/// Transport-level failures talking to the weather provider.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Could not reach provider: {0}")]
    ConnectionFailed(String),

    #[error("Provider request timed out")]
    Timeout,

    #[error("Provider returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Undecodable provider response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "The weather service is unreachable. Check your connection."
            }
            NetworkError::Timeout => "The weather service took too long to answer.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is down. Try again later."
            }
            NetworkError::ServerError { .. } => "The weather service rejected the request.",
            NetworkError::InvalidResponse(_) => "The weather service sent data we could not read.",
        }
    }
}

/// Local persisted state errors (snapshot file, export file).
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },

    #[error("Stored data is corrupt: {0}")]
    Corruption(String),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    pub fn user_message(&self) -> &'static str {
        match self {
            StorageError::ReadFailed { .. } => "Unable to read local data.",
            StorageError::WriteFailed { .. } => {
                "Unable to save local data. Check disk space and permissions."
            }
            StorageError::Corruption(_) => "Local data was unreadable and has been ignored.",
            StorageError::Serialization(_) => "Failed to encode data.",
        }
    }
}

/// Problems with `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid setting: {0}")]
    Invalid(String),

    #[error("Could not save settings: {0}")]
    SaveFailed(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "A setting is invalid. Check config.toml.",
            ConfigError::SaveFailed(_) => "Settings could not be saved. Check file permissions.",
        }
    }
}

/// Classify `reqwest` failures into [`NetworkError`].
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() || self.is_body() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
