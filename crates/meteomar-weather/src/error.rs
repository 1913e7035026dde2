//! Weather pipeline error types.

use meteomar_core::{AppError, ConfigError, NetworkError, StorageError};
use thiserror::Error;

/// Failure of a live fetch. Never fatal: the dashboard downgrades to the
/// snapshot cache, then to demo data.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid API key")]
    InvalidCredential,

    #[error("Rate limited by provider")]
    RateLimited { retry_after: Option<u64> },

    #[error("Provider returned HTTP {status}")]
    ProviderError { status: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] NetworkError),

    #[error("Undecodable provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned no hourly data")]
    NoData,
}

impl FetchError {
    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCredential => "Weather API key is invalid. Check settings.".to_string(),
            Self::RateLimited {
                retry_after: Some(secs),
            } => format!("Daily request quota reached. Retry in {} seconds.", secs),
            Self::RateLimited { retry_after: None } => {
                "Daily request quota reached. Please try again later.".to_string()
            }
            Self::ProviderError { status } if *status >= 500 => {
                "Weather service unavailable. Please try again later.".to_string()
            }
            Self::ProviderError { status } => format!("Weather service error ({}).", status),
            Self::Transport(e) => e.user_message().to_string(),
            Self::InvalidResponse(_) => "Weather service sent unexpected data.".to_string(),
            Self::NoData => "No weather data available for this location.".to_string(),
        }
    }

    /// Short reason shown in the degraded-source banner.
    pub fn degraded_reason(&self) -> &'static str {
        match self {
            Self::InvalidCredential => "clé API invalide",
            Self::RateLimited { .. } => "quota de requêtes atteint",
            Self::ProviderError { .. } => "service météo indisponible",
            Self::Transport(_) => "réseau indisponible",
            Self::InvalidResponse(_) => "réponse illisible",
            Self::NoData => "aucune donnée",
        }
    }
}

/// Errors from dashboard commands. Fetch failures never show up here.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Nothing has been displayed yet")]
    NothingToExport,

    #[error("Failed to create weather provider: {0}")]
    Provider(#[from] FetchError),

    #[error("Failed to save settings: {0}")]
    Settings(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Storage(e) => AppError::Storage(e),
            DashboardError::Settings(message) => {
                AppError::Config(ConfigError::SaveFailed(message))
            }
            other => AppError::Weather(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        assert!(FetchError::InvalidCredential.user_message().contains("API key"));

        let err = FetchError::RateLimited {
            retry_after: Some(30),
        };
        assert!(err.user_message().contains("30"));

        let err = FetchError::ProviderError { status: 503 };
        assert!(err.user_message().contains("later"));

        let err = FetchError::ProviderError { status: 418 };
        assert!(err.user_message().contains("418"));
    }

    #[test]
    fn test_transport_message_comes_from_network_error() {
        let err = FetchError::from(NetworkError::Timeout);
        assert_eq!(err.user_message(), NetworkError::Timeout.user_message());
    }

    #[test]
    fn test_degraded_reasons_are_distinct() {
        let reasons = [
            FetchError::InvalidCredential.degraded_reason(),
            FetchError::RateLimited { retry_after: None }.degraded_reason(),
            FetchError::ProviderError { status: 500 }.degraded_reason(),
            FetchError::Transport(NetworkError::Timeout).degraded_reason(),
            FetchError::InvalidResponse("x".into()).degraded_reason(),
            FetchError::NoData.degraded_reason(),
        ];
        let unique: std::collections::HashSet<_> = reasons.iter().collect();
        assert_eq!(unique.len(), reasons.len());
    }

    #[test]
    fn test_dashboard_error_into_app_error() {
        let err: AppError = DashboardError::UnknownLocation("paris".into()).into();
        assert!(matches!(err, AppError::Weather(ref m) if m.contains("paris")));

        let err: AppError = DashboardError::Settings("disk full".into()).into();
        assert!(matches!(err, AppError::Config(ConfigError::SaveFailed(_))));

        let err: AppError = DashboardError::Storage(StorageError::Corruption("x".into())).into();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
