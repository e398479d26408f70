//! Error types for dashboard data and voice operations
//!
//! Errors fall into two kinds:
//! - Transport: network failures, non-2xx responses, unparseable bodies
//! - NotSupported: no speech device available on this host
//!
//! Config and IO variants only come from configuration file handling.

use thiserror::Error;

/// Error type shared by the data client, containers and speech service
#[derive(Debug, Error)]
pub enum DashboardError {
    // Transport errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    // Host capability
    #[error("Not supported: {0}")]
    NotSupported(String),

    // Configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl DashboardError {
    /// Returns true for failures of the remote backend or the network path to it
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            DashboardError::Network(_) | DashboardError::Api { .. } | DashboardError::Parse(_)
        )
    }

    /// Returns true when the host lacks a required capability
    pub fn is_not_supported(&self) -> bool {
        matches!(self, DashboardError::NotSupported(_))
    }

    /// The underlying message without the kind prefix. May be empty.
    pub fn detail(&self) -> &str {
        match self {
            DashboardError::Network(m)
            | DashboardError::Parse(m)
            | DashboardError::NotSupported(m)
            | DashboardError::Config(m)
            | DashboardError::Io(m) => m,
            DashboardError::Api { message, .. } => message,
        }
    }

    /// Get a user-friendly recovery suggestion
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            DashboardError::Network(_) => "Check your connection to the CRM instance and try again.",
            DashboardError::Api { status, .. } if *status == 401 || *status == 403 => {
                "Check the API token in ~/.advisor-assistant/config.json"
            }
            DashboardError::Api { .. } => "The CRM instance rejected the request. Try again later.",
            DashboardError::Parse(_) => "The CRM instance returned data in an unexpected format.",
            DashboardError::NotSupported(_) => "Voice output is unavailable on this device.",
            DashboardError::Config(_) => "Check your configuration in ~/.advisor-assistant/config.json",
            DashboardError::Io(_) => "Check file permissions and disk space.",
        }
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        DashboardError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DashboardError::Parse(err.to_string())
        } else {
            DashboardError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Parse(err.to_string())
    }
}

/// Serializable error representation for the view layer
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub message: String,
    pub error_kind: ErrorKind,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Transport,
    NotSupported,
    Local,
}

impl From<&DashboardError> for ErrorPayload {
    fn from(err: &DashboardError) -> Self {
        let error_kind = if err.is_transport() {
            ErrorKind::Transport
        } else if err.is_not_supported() {
            ErrorKind::NotSupported
        } else {
            ErrorKind::Local
        };

        ErrorPayload {
            message: err.to_string(),
            error_kind,
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
