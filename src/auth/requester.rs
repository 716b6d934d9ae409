use tracing::debug;

use super::device_code::DeviceAuthorization;
use super::error::AuthError;
use crate::config::ClientConfig;

/// Obtains device codes from the authorization endpoint.
///
/// Failures here are never retried.
#[derive(Debug, Clone, Default)]
pub struct DeviceAuthorizationRequester {
    client: reqwest::Client,
}

impl DeviceAuthorizationRequester {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn request_device_authorization(
        &self,
        config: &ClientConfig,
    ) -> Result<DeviceAuthorization, AuthError> {
        debug!(url = %config.authorization_url(), "requesting device code");
        let resp = self
            .client
            .post(config.authorization_url().clone())
            .header("Accept", "application/json")
            .form(&[
                ("client_id", config.client_id()),
                ("response_type", "device_code"),
                ("scope", config.scope()),
            ])
            .send()
            .await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(AuthError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        DeviceAuthorization::from_body(&body)
    }
}
