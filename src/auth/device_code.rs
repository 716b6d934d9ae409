use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumString};

use super::error::AuthError;
use super::token::AccessToken;

/// Grant type sent to the token endpoint while polling.
pub const DEVICE_CODE_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Device-code session details returned by the authorization endpoint.
///
/// Single use: once polling reaches a terminal state the session is spent.
///
/// # Example
/// ```
/// use device_grant::auth::DeviceAuthorization;
///
/// let session = DeviceAuthorization {
///     device_code: "device-code".to_string(),
///     user_code: "ABCD-EFGH".to_string(),
///     verification_uri: "https://auth.example.com/device".to_string(),
///     verification_uri_complete: None,
///     interval_secs: 5,
///     expires_in: Some(900),
/// };
/// assert_eq!(session.interval().as_secs(), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAuthorization {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    pub verification_uri_complete: Option<String>,
    /// Whole seconds between polls, never below 1.
    pub interval_secs: u64,
    pub expires_in: Option<u64>,
}

impl DeviceAuthorization {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Parse the authorization endpoint's JSON body.
    pub fn from_body(body: &str) -> Result<Self, AuthError> {
        let payload: DeviceAuthorizationResponse = serde_json::from_str(body)?;
        Ok(Self {
            device_code: payload.device_code,
            user_code: payload.user_code,
            verification_uri: payload.verification_uri,
            verification_uri_complete: payload.verification_uri_complete,
            interval_secs: payload.interval.max(1),
            expires_in: payload.expires_in,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DeviceAuthorizationResponse {
    device_code: String,
    user_code: String,
    #[serde(alias = "verification_url")]
    verification_uri: String,
    verification_uri_complete: Option<String>,
    interval: u64,
    expires_in: Option<u64>,
}

/// Error codes a token endpoint may return while the grant is in flight.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum GrantErrorCode {
    AuthorizationPending,
    SlowDown,
    AccessDenied,
    ExpiredToken,
    #[strum(default)]
    Other(String),
}

impl GrantErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::AuthorizationPending => "authorization_pending",
            Self::SlowDown => "slow_down",
            Self::AccessDenied => "access_denied",
            Self::ExpiredToken => "expired_token",
            Self::Other(code) => code,
        }
    }
}

/// One token-endpoint response, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenResponse {
    /// Operator has not finished yet.
    Pending,
    /// Server wants a longer interval.
    SlowDown,
    Success(AccessToken),
    /// Anything else; carries the raw document.
    Failure {
        error: Option<GrantErrorCode>,
        document: Value,
    },
}

impl TokenResponse {
    /// Classify a parsed token-endpoint document.
    ///
    /// A document with a non-null `access_token` must deserialize fully into
    /// [`AccessToken`], otherwise the response is malformed.
    pub fn from_document(document: Value) -> Result<Self, AuthError> {
        let error = document
            .get("error")
            .and_then(Value::as_str)
            .map(|code| {
                GrantErrorCode::from_str(code)
                    .unwrap_or_else(|_| GrantErrorCode::Other(code.to_string()))
            });

        match error {
            Some(GrantErrorCode::AuthorizationPending) => return Ok(Self::Pending),
            Some(GrantErrorCode::SlowDown) => return Ok(Self::SlowDown),
            _ => {}
        }

        if document.get("access_token").is_some_and(|v| !v.is_null()) {
            let token: AccessToken = serde_json::from_value(document)?;
            return Ok(Self::Success(token));
        }

        Ok(Self::Failure { error, document })
    }
}

/// States of the polling state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PollState {
    Pending,
    Authorized,
    Denied,
    TimedOut,
    Canceled,
}

impl PollState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}
