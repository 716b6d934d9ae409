use serde::{Deserialize, Serialize};

/// Access token issued by a successful device-code exchange.
///
/// # Example
/// ```
/// use device_grant::auth::AccessToken;
///
/// let token = AccessToken {
///     access_token: "tok".to_string(),
///     token_type: "Bearer".to_string(),
///     expires_in: 3600,
/// };
/// assert_eq!(token.authorization_value(), "Bearer tok");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds from issuance.
    pub expires_in: u64,
}

impl AccessToken {
    /// Value for the `Authorization` header.
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    pub fn is_bearer(&self) -> bool {
        self.token_type.eq_ignore_ascii_case("bearer")
    }
}
