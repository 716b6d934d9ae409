use std::time::Duration;

use bon::Builder;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::device_code::{DeviceAuthorization, PollState, TokenResponse, DEVICE_CODE_GRANT_TYPE};
use super::error::AuthError;
use super::token::AccessToken;
use crate::config::ClientConfig;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 180;
pub const DEFAULT_MAX_ELAPSED: Duration = Duration::from_secs(15 * 60);
/// RFC 8628 §3.5: every `slow_down` adds five seconds to the interval.
pub const SLOW_DOWN_INCREMENT: Duration = Duration::from_secs(5);

/// Bounds for one polling run.
///
/// # Example
/// ```
/// use device_grant::auth::PollOptions;
///
/// let options = PollOptions::builder().max_attempts(3).build();
/// assert_eq!(options.max_attempts, 3);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct PollOptions {
    /// Token requests to send before giving up. Values below 1 count as 1:
    /// the first request is always sent.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,
    /// Total polling time, including requests still in flight. Also capped by
    /// the server's `expires_in` when it sends one.
    #[builder(default = DEFAULT_MAX_ELAPSED)]
    pub max_elapsed: Duration,
    #[builder(default = SLOW_DOWN_INCREMENT)]
    pub slow_down_increment: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Polls the token endpoint until the grant is authorized, denied, times out
/// or is canceled.
#[derive(Debug, Clone, Default)]
pub struct TokenPoller {
    client: reqwest::Client,
}

impl TokenPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn poll_for_token(
        &self,
        config: &ClientConfig,
        session: &DeviceAuthorization,
        options: &PollOptions,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, AuthError> {
        let started = Instant::now();
        let max_elapsed = match session.expires_in {
            Some(secs) => options.max_elapsed.min(Duration::from_secs(secs)),
            None => options.max_elapsed,
        };
        let deadline = started
            .checked_add(max_elapsed)
            .unwrap_or_else(|| started + DEFAULT_MAX_ELAPSED);
        let max_attempts = options.max_attempts.max(1);
        let mut interval = session.interval();
        let mut attempts = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(finish(PollState::Canceled, attempts, AuthError::Canceled));
            }
            attempts += 1;

            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(finish(PollState::Canceled, attempts, AuthError::Canceled));
                }
                response = self.exchange(config, session) => response?,
                _ = tokio::time::sleep_until(deadline) => {
                    let elapsed = started.elapsed();
                    return Err(finish(
                        PollState::TimedOut,
                        attempts,
                        AuthError::PollingTimedOut { attempts, elapsed },
                    ));
                }
            };

            match response {
                TokenResponse::Pending => {
                    debug!(attempt = attempts, "authorization pending");
                }
                TokenResponse::SlowDown => {
                    interval += options.slow_down_increment;
                    warn!(
                        attempt = attempts,
                        interval_secs = interval.as_secs(),
                        "token endpoint asked to slow down"
                    );
                }
                TokenResponse::Success(token) => {
                    debug!(state = %PollState::Authorized, attempts, "device poll finished");
                    return Ok(token);
                }
                TokenResponse::Failure { error, document } => {
                    let error = error.map(|code| code.as_str().to_string());
                    return Err(finish(
                        PollState::Denied,
                        attempts,
                        AuthError::AuthorizationDenied { error, document },
                    ));
                }
            }

            let elapsed = started.elapsed();
            if attempts >= max_attempts || elapsed + interval > max_elapsed {
                return Err(finish(
                    PollState::TimedOut,
                    attempts,
                    AuthError::PollingTimedOut { attempts, elapsed },
                ));
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(finish(PollState::Canceled, attempts, AuthError::Canceled));
                }
                _ = tokio::time::sleep(interval) => {}
            }
        }
    }

    async fn exchange(
        &self,
        config: &ClientConfig,
        session: &DeviceAuthorization,
    ) -> Result<TokenResponse, AuthError> {
        let resp = self
            .client
            .post(config.token_url().clone())
            .header("Accept", "application/json")
            .form(&[
                ("client_id", config.client_id()),
                ("grant_type", DEVICE_CODE_GRANT_TYPE),
                ("device_code", session.device_code.as_str()),
            ])
            .send()
            .await?;
        // Pending and denied responses usually arrive as 400 with a JSON body,
        // so the status alone does not decide the outcome.
        let status = resp.status();
        let body = resp.text().await?;
        let document: serde_json::Value = match serde_json::from_str(&body) {
            Ok(document) => document,
            Err(_) if !status.is_success() => {
                return Err(AuthError::HttpStatus {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => return Err(e.into()),
        };
        TokenResponse::from_document(document)
    }
}

fn finish(state: PollState, attempts: u32, error: AuthError) -> AuthError {
    debug!(state = %state, attempts, error = %error, "device poll finished");
    error
}
