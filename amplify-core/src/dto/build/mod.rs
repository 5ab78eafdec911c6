//! Build API response envelopes

use serde::{Deserialize, Serialize};

use crate::domain::job::BuildJob;
use crate::domain::step::BuildJobStep;

/// Response of the branch build listing
///
/// `next_token` is the pagination cursor; only the first page is ever read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBuildJobsResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    pub jobs: Vec<BuildJob>,
}

impl GetBuildJobsResponse {
    /// The first `count` jobs, in the order the API returned them
    pub fn latest(&self, count: usize) -> &[BuildJob] {
        &self.jobs[..count.min(self.jobs.len())]
    }
}

/// Step manifest for a single job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildJobLogResponse {
    pub job_id: String,
    pub steps: Vec<BuildJobStep>,
}
