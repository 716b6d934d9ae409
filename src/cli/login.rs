//! Handlers for `login` and `get`.

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use super::ClientArgs;
use crate::auth::{DeviceAuthorization, DeviceLogin};

/// Install the stderr log subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// Handle `device-grant login`.
pub async fn handle_login(args: &ClientArgs) -> Result<(), Box<dyn std::error::Error>> {
    let login = build_login(args)?;
    let cancel = cancel_on_ctrl_c();
    if !login.login(&cancel).await {
        return Err("login failed".into());
    }
    println!("✅ Login successful");
    Ok(())
}

/// Handle `device-grant get <url>`.
pub async fn handle_get(args: &ClientArgs, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let login = build_login(args)?;
    let cancel = cancel_on_ctrl_c();
    if !login.login(&cancel).await {
        return Err("login failed".into());
    }

    let client = login.client_factory().create_authenticated_client()?;
    let response = client.get(url).send().await?.error_for_status()?;
    let body: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn build_login(args: &ClientArgs) -> Result<DeviceLogin, Box<dyn std::error::Error>> {
    let config = args.settings().client_config()?;
    Ok(DeviceLogin::new(config)
        .with_poll_options(args.poll_options())
        .with_prompt(print_prompt))
}

fn print_prompt(session: &DeviceAuthorization) {
    println!("🔗 Visit: {}", session.verification_uri);
    println!("📋 Enter code: {}", session.user_code);
    if let Some(complete) = &session.verification_uri_complete {
        println!("   Or open: {complete}");
    }
    println!("⏳ Waiting for authorization...");
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    cancel
}
