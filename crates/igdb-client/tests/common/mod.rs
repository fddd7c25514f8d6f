//! Common test utilities for integration tests
#![allow(dead_code)]

use igdb_client::IgdbConfig;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CLIENT_ID: &str = "it_client";
pub const CLIENT_SECRET: &str = "it_secret";

/// Config pointing both endpoints at the mock server
pub fn config_for(server: &MockServer) -> IgdbConfig {
    IgdbConfig {
        token_url: format!("{}/oauth2/token", server.uri()),
        api_base_url: format!("{}/v4", server.uri()),
        request_timeout_secs: 2,
        token_timeout_secs: 2,
        ..IgdbConfig::new(CLIENT_ID, CLIENT_SECRET)
    }
}

/// Token endpoint response body
pub fn token_body(access_token: &str, expires_in: i64) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "expires_in": expires_in,
        "token_type": "bearer",
    })
}

/// Mounts a token endpoint that expects the client-credentials grant
pub async fn mount_token(server: &MockServer, access_token: &str, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(query_param("client_id", CLIENT_ID))
        .and(query_param("client_secret", CLIENT_SECRET))
        .and(query_param("grant_type", "client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access_token, 3600)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Returns an address nothing is listening on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
