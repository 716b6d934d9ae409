//! device-grant — OAuth 2.0 Device Authorization Grant client.
//!
//! Requests a device code, shows the operator where to approve it, polls the
//! token endpoint, and hands out HTTP clients that carry the resulting bearer
//! token.
//!
//! # Quick Start
//!
//! ```no_run
//! use device_grant::auth::DeviceLogin;
//! use device_grant::config::ClientConfig;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), device_grant::auth::AuthError> {
//! let config = ClientConfig::new(
//!     "my-client",
//!     "https://auth.example.com/oauth/v2/device_authorization",
//!     "https://auth.example.com/oauth/v2/token",
//! )?;
//! let login = DeviceLogin::new(config);
//! let token = login.try_login(&CancellationToken::new()).await?;
//! println!("token type: {}", token.token_type);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;

#[cfg(feature = "cli")]
pub mod cli;
