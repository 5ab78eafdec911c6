//! Build-related API endpoints

use amplify_core::dto::build::{BuildJobLogResponse, GetBuildJobsResponse};
use tracing::debug;

use crate::AmplifyClient;
use crate::error::Result;

/// Path of the headless-app builds resource, relative to the API host
const BUILDS_PATH: [&str; 5] = ["api", "platform", "appdev", "headless-app", "builds"];

impl AmplifyClient {
    // =============================================================================
    // Build Jobs
    // =============================================================================

    /// List the build jobs of a branch
    ///
    /// Only the first page is returned; `next_token` is left for the caller.
    ///
    /// # Arguments
    /// * `branch_name` - The branch whose builds to list
    pub async fn get_build_jobs(&self, branch_name: &str) -> Result<GetBuildJobsResponse> {
        let url = self.endpoint(&[&BUILDS_PATH[..], &[branch_name][..]].concat())?;
        debug!(%url, "Fetching build jobs");

        let request = self.authorize(self.client.get(url)).await?;
        let response = request.send().await?;

        self.handle_response(response).await
    }

    /// Get the step manifest of a build job
    ///
    /// # Arguments
    /// * `branch_name` - The branch the job ran on
    /// * `job_id` - The job identifier
    pub async fn get_build_log(
        &self,
        branch_name: &str,
        job_id: &str,
    ) -> Result<BuildJobLogResponse> {
        let url = self.endpoint(&[&BUILDS_PATH[..], &[branch_name, "logs", job_id][..]].concat())?;
        debug!(%url, "Fetching build log manifest");

        let request = self.authorize(self.client.get(url)).await?;
        let response = request.send().await?;

        self.handle_response(response).await
    }

    // =============================================================================
    // Step Logs
    // =============================================================================

    /// Download the text of a step log
    ///
    /// Log URLs are pre-signed, so no authorization headers are sent. The
    /// body is returned exactly as served.
    pub async fn fetch_log_text(&self, log_url: &str) -> Result<String> {
        debug!(url = %log_url, "Downloading step log");
        let response = self.client.get(log_url).send().await?;

        self.handle_text_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use crate::ClientError;
    use crate::test_helpers::{TEST_TOKEN, mount_auth, test_client};
    use wiremock::matchers::{header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_build_jobs_signed_request() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/platform/appdev/headless-app/builds/kibo-sb-main"))
            .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .and(header("x-vol-tenant", "100"))
            .and(header("x-vol-site", "200"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "nextToken": "abc",
                "jobs": [
                    {
                        "jobId": "42",
                        "status": "SUCCEED",
                        "commitId": "c0ffee",
                        "commitTime": "2024-05-01T09:00:00Z",
                        "startTime": "2024-05-01T09:01:00Z",
                        "endTime": "2024-05-01T09:05:00Z"
                    },
                    {"jobId": "41", "status": "FAILED"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = test_client(&server)
            .get_build_jobs("kibo-sb-main")
            .await
            .unwrap();

        assert_eq!(response.jobs.len(), 2);
        assert_eq!(response.jobs[0].job_id, "42");
        assert_eq!(response.jobs[1].job_id, "41");
        assert_eq!(response.next_token.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_get_build_jobs_server_error() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/platform/appdev/headless-app/builds/main"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let err = test_client(&server).get_build_jobs("main").await.unwrap_err();
        assert!(err.is_server_error());
        assert!(matches!(err, ClientError::ApiError { status: 500, ref message } if message == "internal"));
    }

    #[tokio::test]
    async fn test_get_build_jobs_malformed_json() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/platform/appdev/headless-app/builds/main"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"jobs\": ["))
            .mount(&server)
            .await;

        let err = test_client(&server).get_build_jobs("main").await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_auth_failure_skips_api_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/platform/applications/authtickets/oauth"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = test_client(&server).get_build_jobs("main").await.unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_get_build_log() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/platform/appdev/headless-app/builds/main/logs/42"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "jobId": "42",
                "steps": [
                    {
                        "stepName": "build",
                        "status": "success",
                        "logUrl": "https://logs.example.com/build.txt",
                        "startTime": "2024-05-01T09:01:00Z",
                        "endTime": "2024-05-01T09:03:00Z"
                    },
                    {"stepName": "deploy", "status": "pending"}
                ]
            })))
            .mount(&server)
            .await;

        let manifest = test_client(&server).get_build_log("main", "42").await.unwrap();

        assert_eq!(manifest.job_id, "42");
        assert_eq!(manifest.steps.len(), 2);
        assert_eq!(manifest.steps[0].step_name, "build");
        assert!(manifest.steps[1].log_url().is_none());
    }

    #[tokio::test]
    async fn test_branch_name_is_path_encoded() {
        let server = MockServer::start().await;
        mount_auth(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/platform/appdev/headless-app/builds/feature%2Fcheckout"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "jobs": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = test_client(&server)
            .get_build_jobs("feature/checkout")
            .await
            .unwrap();
        assert!(response.jobs.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_log_text_verbatim_without_auth() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/logs/build.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("line 1\nline 2\n"))
            .mount(&server)
            .await;

        // No auth mock mounted: the download must not need a ticket
        let text = test_client(&server)
            .fetch_log_text(&format!("{}/logs/build.txt", server.uri()))
            .await
            .unwrap();
        assert_eq!(text, "line 1\nline 2\n");
    }

    #[tokio::test]
    async fn test_fetch_log_text_expired_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/logs/expired.txt"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Request has expired"))
            .mount(&server)
            .await;

        let err = test_client(&server)
            .fetch_log_text(&format!("{}/logs/expired.txt", server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }
}
