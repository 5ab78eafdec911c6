//! Build job domain types

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::{path_safe, time};

/// One execution record of a branch's build pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildJob {
    pub job_id: String,
    pub status: String,
    #[serde(default)]
    pub commit_id: Option<String>,
    /// Raw wire timestamps; see [`time`]
    #[serde(default, deserialize_with = "time::lenient")]
    pub commit_time: Option<String>,
    #[serde(default, deserialize_with = "time::lenient")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "time::lenient")]
    pub end_time: Option<String>,
}

impl BuildJob {
    /// Name of the folder a run stores this job's logs in
    ///
    /// Formatted as `JobID_<jobId>_<ISO timestamp>`, where the timestamp is
    /// the moment of the run (millisecond precision, `Z` suffix), so two runs
    /// over the same job never collide. Path separators in the job id are
    /// replaced so the folder is always a direct child of the output dir.
    pub fn folder_name(&self, run_at: DateTime<Utc>) -> String {
        format!(
            "JobID_{}_{}",
            path_safe(&self.job_id),
            run_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        )
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        time::parse(self.start_time.as_deref())
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        time::parse(self.end_time.as_deref())
    }

    /// Wall-clock duration of the job, if it has finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at(), self.ended_at()) {
            (Some(start), Some(end)) => Some(end.signed_duration_since(start)),
            _ => None,
        }
    }
}
