#![allow(dead_code)]

use device_grant::auth::{AccessToken, DeviceAuthorization};
use device_grant::config::ClientConfig;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "test-client";
pub const DEVICE_PATH: &str = "/oauth/v2/device_authorization";
pub const TOKEN_PATH: &str = "/oauth/v2/token";

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(
        CLIENT_ID,
        &format!("{}{DEVICE_PATH}", server.uri()),
        &format!("{}{TOKEN_PATH}", server.uri()),
    )
    .expect("valid mock server config")
}

pub fn session(interval_secs: u64) -> DeviceAuthorization {
    DeviceAuthorization {
        device_code: "device-code-1".to_string(),
        user_code: "ABCD-EFGH".to_string(),
        verification_uri: "https://auth.example.com/device".to_string(),
        verification_uri_complete: None,
        interval_secs,
        expires_in: None,
    }
}

pub fn device_body(interval: u64) -> Value {
    json!({
        "device_code": "device-code-1",
        "user_code": "ABCD-EFGH",
        "verification_uri": "https://auth.example.com/device",
        "interval": interval
    })
}

pub fn token_body(access_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600
    })
}

pub fn pending_body() -> Value {
    json!({ "error": "authorization_pending" })
}

pub fn token(access_token: &str) -> AccessToken {
    AccessToken {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
    }
}
