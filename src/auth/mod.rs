//! OAuth 2.0 device authorization grant and in-process token storage.

pub mod client;
pub mod device_code;
pub mod error;
pub mod poller;
pub mod requester;
pub mod service;
pub mod store;
pub mod token;

pub use client::AuthenticatedClientFactory;
pub use device_code::{DeviceAuthorization, GrantErrorCode, PollState, TokenResponse};
pub use error::AuthError;
pub use poller::{PollOptions, TokenPoller};
pub use requester::DeviceAuthorizationRequester;
pub use service::{DeviceLogin, UserPrompt};
pub use store::TokenStore;
pub use token::AccessToken;
