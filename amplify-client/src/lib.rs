//! Amplify HTTP Client
//!
//! A small, type-safe client for the headless-app build API of the Kibo
//! platform. It lists a branch's build jobs, fetches the step manifest of a
//! job and downloads the plain-text step logs.
//!
//! Every platform request is signed with an OAuth auth ticket obtained from
//! the configured auth host. The ticket is cached and reused until it expires.
//!
//! # Example
//!
//! ```no_run
//! use amplify_client::{AmplifyClient, ApiConfig};
//!
//! # async fn example() -> amplify_client::Result<()> {
//! let client = AmplifyClient::new(ApiConfig {
//!     tenant: "12345".to_string(),
//!     site: "67890".to_string(),
//!     client_id: "app.client".to_string(),
//!     shared_secret: "secret".to_string(),
//!     auth_host: "home.mozu.com".to_string(),
//!     api_env: "sandbox".to_string(),
//!     base_url: None,
//! });
//!
//! let builds = client.get_build_jobs("main").await?;
//! println!("{} job(s) on main", builds.jobs.len());
//! # Ok(())
//! # }
//! ```

mod auth;
mod builds;
pub mod error;
#[cfg(test)]
mod test_helpers;

// Re-export commonly used types
pub use amplify_core::dto::build::{BuildJobLogResponse, GetBuildJobsResponse};
pub use error::{ClientError, Result};

use std::sync::Arc;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::auth::CachedTicket;

/// Credentials and environment of the platform tenant
///
/// Values are taken as given; missing credentials surface as an
/// authentication error on the first request.
#[derive(Clone, Default)]
pub struct ApiConfig {
    pub tenant: String,
    pub site: String,
    pub shared_secret: String,
    pub client_id: String,
    /// Auth host, with or without a scheme (defaults to https)
    pub auth_host: String,
    /// Environment name, e.g. "sandbox"
    pub api_env: String,
    /// Overrides the API host derived from tenant and environment
    pub base_url: Option<String>,
}

impl ApiConfig {
    /// Root URL of the tenant's API host
    pub fn api_base_url(&self) -> String {
        match self.base_url.as_deref() {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("https://t{}.{}.mozu.com", self.tenant, self.api_env),
        }
    }

    /// Root URL of the auth host
    pub fn auth_base_url(&self) -> String {
        let host = self.auth_host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("tenant", &self.tenant)
            .field("site", &self.site)
            .field("client_id", &self.client_id)
            .field("shared_secret", &"<redacted>")
            .field("auth_host", &self.auth_host)
            .field("api_env", &self.api_env)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// HTTP client for the headless-app build API
#[derive(Clone)]
pub struct AmplifyClient {
    config: ApiConfig,
    /// Root URL of the API host (no trailing slash)
    base_url: String,
    /// HTTP client instance
    client: Client,
    /// Auth ticket shared by all clones of this client
    ticket: Arc<Mutex<Option<CachedTicket>>>,
}

impl AmplifyClient {
    /// Create a new client for the given tenant configuration
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(config: ApiConfig, client: Client) -> Self {
        Self {
            base_url: config.api_base_url(),
            config,
            client,
            ticket: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the root URL of the API host
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an API URL from path segments, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidRequest(format!("Invalid API base URL '{}': {}", self.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ClientError::InvalidRequest(format!(
                    "API base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let response = Self::check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle a plain-text response, returning the body verbatim
    async fn handle_text_response(&self, response: reqwest::Response) -> Result<String> {
        let response = Self::check_status(response).await?;

        Ok(response.text().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(response)
    }
}

impl std::fmt::Debug for AmplifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmplifyClient")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .finish()
    }
}
