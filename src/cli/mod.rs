//! CLI entry point for device-grant.

pub mod login;

use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::auth::PollOptions;
use crate::config::LoginSettings;

/// Endpoint fetched by `get` when no URL is given.
pub const DEFAULT_USERINFO_URL: &str = "http://localhost:8080/oidc/v1/userinfo";

/// OAuth 2.0 device authorization grant client
#[derive(Parser, Debug)]
#[command(
    name = "device-grant",
    version,
    about = "Log in with the OAuth 2.0 device authorization grant"
)]
pub struct Cli {
    #[command(flatten)]
    pub client: ClientArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and report the result
    Login,
    /// Log in, then GET a URL with the access token and print the JSON body
    Get(GetArgs),
}

/// Arguments for `device-grant get`.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// URL to fetch
    #[arg(default_value = DEFAULT_USERINFO_URL)]
    pub url: String,
}

/// OAuth client and polling overrides shared by all commands.
#[derive(Args, Debug, Default, Clone)]
pub struct ClientArgs {
    /// OAuth client identifier
    #[arg(long, global = true)]
    pub client_id: Option<String>,

    /// Device authorization endpoint
    #[arg(long, global = true)]
    pub authorization_url: Option<String>,

    /// Token endpoint
    #[arg(long, global = true)]
    pub token_url: Option<String>,

    /// Space-separated scopes to request
    #[arg(long, global = true)]
    pub scope: Option<String>,

    /// Give up after this many token requests
    #[arg(long, global = true)]
    pub max_attempts: Option<u32>,

    /// Give up after this many seconds of polling
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

impl ClientArgs {
    /// Flags layered over environment settings.
    pub fn settings(&self) -> LoginSettings {
        LoginSettings::from_env().merge(self.flag_settings())
    }

    fn flag_settings(&self) -> LoginSettings {
        LoginSettings {
            client_id: self.client_id.clone(),
            authorization_url: self.authorization_url.clone(),
            token_url: self.token_url.clone(),
            scope: self.scope.clone(),
        }
    }

    pub fn poll_options(&self) -> PollOptions {
        let mut options = PollOptions::default();
        if let Some(max) = self.max_attempts {
            options.max_attempts = max;
        }
        if let Some(secs) = self.timeout_secs {
            options.max_elapsed = Duration::from_secs(secs);
        }
        options
    }
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_login() {
        let cli = Cli::try_parse_from(["device-grant", "login"]).unwrap();
        assert!(matches!(cli.command, Commands::Login));
        assert_eq!(cli.verbose, 0);
        assert!(cli.client.client_id.is_none());
    }

    #[test]
    fn parse_get_defaults_to_userinfo() {
        let cli = Cli::try_parse_from(["device-grant", "get"]).unwrap();
        match cli.command {
            Commands::Get(args) => assert_eq!(args.url, DEFAULT_USERINFO_URL),
            other => panic!("expected Get, got {other:?}"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "device-grant",
            "get",
            "https://api.example.com/me",
            "--client-id",
            "abc",
            "--token-url",
            "https://auth.example.com/token",
            "--max-attempts",
            "3",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.client.client_id.as_deref(), Some("abc"));
        assert_eq!(
            cli.client.token_url.as_deref(),
            Some("https://auth.example.com/token")
        );
        assert_eq!(cli.client.poll_options().max_attempts, 3);
        match cli.command {
            Commands::Get(args) => assert_eq!(args.url, "https://api.example.com/me"),
            other => panic!("expected Get, got {other:?}"),
        }
    }

    #[test]
    fn poll_options_keep_defaults_without_flags() {
        let options = ClientArgs::default().poll_options();
        assert_eq!(options.max_attempts, crate::auth::poller::DEFAULT_MAX_ATTEMPTS);
        assert_eq!(options.max_elapsed, crate::auth::poller::DEFAULT_MAX_ELAPSED);
    }

    #[test]
    fn poll_flags_override_defaults() {
        let args = ClientArgs {
            max_attempts: Some(5),
            timeout_secs: Some(30),
            ..Default::default()
        };
        let options = args.poll_options();
        assert_eq!(options.max_attempts, 5);
        assert_eq!(options.max_elapsed, Duration::from_secs(30));
    }

    #[test]
    fn parse_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["device-grant"]).is_err());
    }
}
