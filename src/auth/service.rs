use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::client::AuthenticatedClientFactory;
use super::device_code::DeviceAuthorization;
use super::error::AuthError;
use super::poller::{PollOptions, TokenPoller};
use super::requester::DeviceAuthorizationRequester;
use super::store::TokenStore;
use super::token::AccessToken;
use crate::config::ClientConfig;

/// Callback that shows the operator where to authorize.
pub type UserPrompt = Arc<dyn Fn(&DeviceAuthorization) + Send + Sync>;

/// Runs the full device login: request a code, prompt, poll, store the token.
///
/// # Example
/// ```no_run
/// use device_grant::auth::DeviceLogin;
/// use device_grant::config::LoginSettings;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), device_grant::auth::AuthError> {
/// let config = LoginSettings::from_env().client_config()?;
/// let login = DeviceLogin::new(config);
/// if login.login(&CancellationToken::new()).await {
///     let client = login.client_factory().create_authenticated_client()?;
///     let _ = client;
/// }
/// # Ok(())
/// # }
/// ```
pub struct DeviceLogin {
    config: ClientConfig,
    requester: DeviceAuthorizationRequester,
    poller: TokenPoller,
    options: PollOptions,
    store: TokenStore,
    prompt: UserPrompt,
}

impl fmt::Debug for DeviceLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceLogin")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("store", &self.store)
            .field("prompt", &"..")
            .finish()
    }
}

impl DeviceLogin {
    pub fn new(config: ClientConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            config,
            requester: DeviceAuthorizationRequester::with_client(client.clone()),
            poller: TokenPoller::with_client(client),
            options: PollOptions::default(),
            store: TokenStore::new(),
            prompt: Arc::new(log_prompt),
        }
    }

    /// Share one HTTP client between the device and token requests.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.requester = DeviceAuthorizationRequester::with_client(client.clone());
        self.poller = TokenPoller::with_client(client);
        self
    }

    pub fn with_store(mut self, store: TokenStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_poll_options(mut self, options: PollOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_prompt(
        mut self,
        prompt: impl Fn(&DeviceAuthorization) + Send + Sync + 'static,
    ) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn client_factory(&self) -> AuthenticatedClientFactory {
        AuthenticatedClientFactory::new(self.store.clone())
    }

    /// Log in and report success. Failures are logged, never raised.
    pub async fn login(&self, cancel: &CancellationToken) -> bool {
        match self.try_login(cancel).await {
            Ok(_) => {
                info!("Authorization complete");
                true
            }
            Err(e) => {
                error!(error = %e, "Authorization failed");
                false
            }
        }
    }

    /// Log in and return the new token, storing it on success.
    pub async fn try_login(&self, cancel: &CancellationToken) -> Result<AccessToken, AuthError> {
        let session = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AuthError::Canceled),
            session = self.requester.request_device_authorization(&self.config) => session?,
        };

        (self.prompt)(&session);

        let token = self
            .poller
            .poll_for_token(&self.config, &session, &self.options, cancel)
            .await?;
        self.store.set(token.clone());
        Ok(token)
    }
}

fn log_prompt(session: &DeviceAuthorization) {
    info!(
        verification_uri = %session.verification_uri,
        user_code = %session.user_code,
        "Please login at {} with user code {}; waiting for authorization to complete",
        session.verification_uri,
        session.user_code
    );
}
