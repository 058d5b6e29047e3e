#![allow(dead_code)]

use appstore_connect::{AppStoreConnect, ClientConfig, StaticTokenProvider};
use httpmock::MockServer;

pub const TOKEN: &str = "test-token";

/// Client pointed at the mock server with a static token
pub fn client(server: &MockServer) -> AppStoreConnect {
    let config = ClientConfig::default().with_base_url(server.base_url());
    AppStoreConnect::with_config(config, StaticTokenProvider::new(TOKEN)).unwrap()
}

pub fn bearer() -> String {
    format!("Bearer {}", TOKEN)
}
