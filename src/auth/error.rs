use std::time::Duration;

use thiserror::Error;

/// Errors produced by the device authorization flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Not logged in")]
    NotAuthenticated,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("Authorization denied: {}", .error.as_deref().unwrap_or("no error code"))]
    AuthorizationDenied {
        error: Option<String>,
        document: serde_json::Value,
    },
    #[error("Timed out waiting for authorization after {attempts} attempts ({}s)", .elapsed.as_secs())]
    PollingTimedOut { attempts: u32, elapsed: Duration },
    #[error("Login canceled")]
    Canceled,
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AuthError {
    /// Transport failures and non-success statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { .. })
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::MalformedResponse(error.to_string());
        }
        Self::Network(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedResponse(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_grouping_covers_transport_and_status() {
        assert!(AuthError::Network("refused".into()).is_network());
        assert!(AuthError::HttpStatus {
            status: 400,
            body: String::new()
        }
        .is_network());
        assert!(!AuthError::NotAuthenticated.is_network());
    }

    #[test]
    fn denied_message_names_error_code() {
        let err = AuthError::AuthorizationDenied {
            error: Some("access_denied".into()),
            document: serde_json::json!({"error": "access_denied"}),
        };
        assert_eq!(err.to_string(), "Authorization denied: access_denied");
    }

    #[test]
    fn serde_errors_become_malformed_response() {
        let err: AuthError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AuthError::MalformedResponse(_)));
    }
}
