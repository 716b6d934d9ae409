//! Client configuration (layered: explicit > env > built-in defaults).

use reqwest::Url;

use crate::auth::AuthError;

/// Scope requested with every device authorization.
pub const DEFAULT_SCOPE: &str = "openid profile";
pub const DEFAULT_CLIENT_ID: &str = "355629494930863364";
pub const DEFAULT_AUTHORIZATION_URL: &str = "http://localhost:8080/oauth/v2/device_authorization";
pub const DEFAULT_TOKEN_URL: &str = "http://localhost:8080/oauth/v2/token";

pub const CLIENT_ID_ENV: &str = "DEVICE_GRANT_CLIENT_ID";
pub const AUTHORIZATION_URL_ENV: &str = "DEVICE_GRANT_AUTHORIZATION_URL";
pub const TOKEN_URL_ENV: &str = "DEVICE_GRANT_TOKEN_URL";
pub const SCOPE_ENV: &str = "DEVICE_GRANT_SCOPE";

/// Immutable OAuth client settings consumed by the device flow.
///
/// # Example
/// ```
/// use device_grant::config::ClientConfig;
///
/// let config = ClientConfig::new(
///     "my-client",
///     "https://auth.example.com/device_authorization",
///     "https://auth.example.com/token",
/// )?;
/// assert_eq!(config.scope(), "openid profile");
/// # Ok::<(), device_grant::auth::AuthError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    client_id: String,
    authorization_url: Url,
    token_url: Url,
    scope: String,
}

impl ClientConfig {
    pub fn new(
        client_id: impl Into<String>,
        authorization_url: &str,
        token_url: &str,
    ) -> Result<Self, AuthError> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(AuthError::Configuration("client id is empty".to_string()));
        }
        Ok(Self {
            client_id,
            authorization_url: parse_url("authorization", authorization_url)?,
            token_url: parse_url("token", token_url)?,
            scope: DEFAULT_SCOPE.to_string(),
        })
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn authorization_url(&self) -> &Url {
        &self.authorization_url
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

fn parse_url(label: &str, raw: &str) -> Result<Url, AuthError> {
    Url::parse(raw)
        .map_err(|e| AuthError::Configuration(format!("invalid {label} URL '{raw}': {e}")))
}

/// Unresolved settings gathered from the command line and environment.
#[derive(Debug, Clone, Default)]
pub struct LoginSettings {
    pub client_id: Option<String>,
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    pub scope: Option<String>,
}

impl LoginSettings {
    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            client_id: read(CLIENT_ID_ENV),
            authorization_url: read(AUTHORIZATION_URL_ENV),
            token_url: read(TOKEN_URL_ENV),
            scope: read(SCOPE_ENV),
        }
    }

    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: LoginSettings) -> Self {
        Self {
            client_id: other.client_id.or(self.client_id),
            authorization_url: other.authorization_url.or(self.authorization_url),
            token_url: other.token_url.or(self.token_url),
            scope: other.scope.or(self.scope),
        }
    }

    /// Resolve into a validated [`ClientConfig`], filling gaps with defaults.
    pub fn client_config(&self) -> Result<ClientConfig, AuthError> {
        let config = ClientConfig::new(
            self.client_id.as_deref().unwrap_or(DEFAULT_CLIENT_ID),
            self.authorization_url
                .as_deref()
                .unwrap_or(DEFAULT_AUTHORIZATION_URL),
            self.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL),
        )?;
        Ok(match &self.scope {
            Some(scope) => config.with_scope(scope.clone()),
            None => config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_settings_resolve_to_defaults() {
        let config = LoginSettings::default().client_config().unwrap();
        assert_eq!(config.client_id(), DEFAULT_CLIENT_ID);
        assert_eq!(config.authorization_url().as_str(), DEFAULT_AUTHORIZATION_URL);
        assert_eq!(config.token_url().as_str(), DEFAULT_TOKEN_URL);
        assert_eq!(config.scope(), DEFAULT_SCOPE);
    }

    #[test]
    fn lookup_reads_known_keys_and_skips_blank_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (CLIENT_ID_ENV, "env-client"),
            (TOKEN_URL_ENV, "https://auth.example.com/token"),
            (SCOPE_ENV, "  "),
        ]);
        let settings = LoginSettings::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.client_id.as_deref(), Some("env-client"));
        assert_eq!(settings.token_url.as_deref(), Some("https://auth.example.com/token"));
        assert!(settings.authorization_url.is_none());
        assert!(settings.scope.is_none());
    }

    #[test]
    fn explicit_settings_take_precedence_over_env() {
        let env = LoginSettings {
            client_id: Some("env-client".into()),
            scope: Some("openid".into()),
            ..Default::default()
        };
        let flags = LoginSettings {
            client_id: Some("flag-client".into()),
            ..Default::default()
        };
        let merged = env.merge(flags);
        assert_eq!(merged.client_id.as_deref(), Some("flag-client"));
        assert_eq!(merged.scope.as_deref(), Some("openid"));
    }

    #[test]
    fn invalid_url_is_configuration_error() {
        let err = ClientConfig::new("c", "not a url", DEFAULT_TOKEN_URL).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn blank_client_id_is_rejected() {
        let err = ClientConfig::new(" ", DEFAULT_AUTHORIZATION_URL, DEFAULT_TOKEN_URL).unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }
}
