//! Auth ticket handling
//!
//! Requests are signed with a bearer token issued by the auth host for the
//! configured client credentials, plus the tenant and site headers the
//! platform routes on.

use std::time::{Duration, Instant};

use amplify_core::dto::auth::{AuthTicketRequest, AuthTicketResponse};
use reqwest::RequestBuilder;
use tracing::debug;

use crate::AmplifyClient;
use crate::error::{ClientError, Result};

const AUTH_TICKET_PATH: &str = "/api/platform/applications/authtickets/oauth";

/// Lifetime assumed when the auth host omits `expires_in`
const DEFAULT_TICKET_LIFETIME: Duration = Duration::from_secs(3600);

/// A ticket is refreshed this long before it actually expires
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Upper bound on the lifetime taken from `expires_in`
const MAX_TICKET_LIFETIME: Duration = Duration::from_secs(24 * 3600);

const TENANT_HEADER: &str = "x-vol-tenant";
const SITE_HEADER: &str = "x-vol-site";

/// Access token held in memory for the lifetime of the client
#[derive(Clone)]
pub(crate) struct CachedTicket {
    access_token: String,
    expires_at: Instant,
}

impl CachedTicket {
    fn new(access_token: String, lifetime: Duration) -> Self {
        Self {
            access_token,
            expires_at: Instant::now() + lifetime.min(MAX_TICKET_LIFETIME),
        }
    }

    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

impl AmplifyClient {
    /// Return a valid access token, requesting a new ticket if needed
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.ticket.lock().await;

        if let Some(ticket) = cached.as_ref().filter(|ticket| ticket.is_fresh()) {
            return Ok(ticket.access_token.clone());
        }

        let ticket = self.request_ticket().await?;
        let token = ticket.access_token.clone();
        *cached = Some(ticket);

        Ok(token)
    }

    /// Add the authorization and tenant routing headers to a request
    pub(crate) async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;

        let mut request = request.bearer_auth(token);
        if !self.config.tenant.is_empty() {
            request = request.header(TENANT_HEADER, &self.config.tenant);
        }
        if !self.config.site.is_empty() {
            request = request.header(SITE_HEADER, &self.config.site);
        }

        Ok(request)
    }

    async fn request_ticket(&self) -> Result<CachedTicket> {
        let url = format!("{}{}", self.config.auth_base_url(), AUTH_TICKET_PATH);
        debug!(%url, client_id = %self.config.client_id, "Requesting auth ticket");

        let body = AuthTicketRequest::client_credentials(
            self.config.client_id.clone(),
            self.config.shared_secret.clone(),
        );

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::AuthFailed(format!("Auth host unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ClientError::AuthFailed(format!(
                "Auth host returned status {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let ticket: AuthTicketResponse = response
            .json()
            .await
            .map_err(|e| ClientError::AuthFailed(format!("Malformed auth ticket: {}", e)))?;

        let lifetime = ticket
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TICKET_LIFETIME);
        debug!(expires_in = lifetime.as_secs(), "Auth ticket issued");

        Ok(CachedTicket::new(ticket.access_token, lifetime))
    }
}
