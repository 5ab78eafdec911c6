//! OAuth auth ticket DTOs

use serde::{Deserialize, Serialize};

/// Client-credentials request sent to the auth host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTicketRequest {
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: String,
}

impl AuthTicketRequest {
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            grant_type: "client_credentials".to_string(),
        }
    }
}

/// Access token issued by the auth host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTicketResponse {
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}
