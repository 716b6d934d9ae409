use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::warn;

use super::error::AuthError;
use super::store::TokenStore;

/// Builds HTTP clients that send the stored bearer token.
///
/// The token is captured when a client is built. Logging in again later does
/// not change clients that already exist; build a new one to pick up the new
/// token.
#[derive(Debug, Clone)]
pub struct AuthenticatedClientFactory {
    store: TokenStore,
}

impl AuthenticatedClientFactory {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }

    /// `Authorization` header value for the current token.
    pub fn bearer_header(&self) -> Result<HeaderValue, AuthError> {
        let token = self.store.get()?;
        if !token.is_bearer() {
            warn!(token_type = %token.token_type, "token type is not Bearer; sending as Bearer");
        }
        let mut value = HeaderValue::from_str(&token.authorization_value()).map_err(|_| {
            AuthError::MalformedResponse("access token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }

    pub fn create_authenticated_client(&self) -> Result<reqwest::Client, AuthError> {
        self.create_authenticated_client_with(reqwest::Client::builder())
    }

    /// Same as [`Self::create_authenticated_client`] on top of a caller-tuned builder.
    pub fn create_authenticated_client_with(
        &self,
        builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::Client, AuthError> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.bearer_header()?);
        builder
            .default_headers(headers)
            .build()
            .map_err(|e| AuthError::Configuration(format!("failed to build HTTP client: {e}")))
    }
}
