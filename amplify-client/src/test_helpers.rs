//! Shared fixtures for client tests

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{AmplifyClient, ApiConfig};

pub(crate) const TEST_TOKEN: &str = "test-token";

/// Client pointed at the mock server for both the API and the auth host
pub(crate) fn test_client(server: &MockServer) -> AmplifyClient {
    AmplifyClient::new(ApiConfig {
        tenant: "100".to_string(),
        site: "200".to_string(),
        shared_secret: "secret".to_string(),
        client_id: "app.client".to_string(),
        auth_host: server.uri(),
        api_env: "sandbox".to_string(),
        base_url: Some(server.uri()),
    })
}

/// Mount an auth endpoint that always issues [`TEST_TOKEN`]
pub(crate) async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/platform/applications/authtickets/oauth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": TEST_TOKEN,
            "expires_in": 3600,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}
