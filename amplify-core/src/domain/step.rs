//! Build step domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{path_safe, time};

/// One stage of a build job
///
/// `log_url` is absent when the step produced no downloadable log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildJobStep {
    pub step_name: String,
    pub status: String,
    #[serde(default)]
    pub log_url: Option<String>,
    #[serde(default, deserialize_with = "time::lenient")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "time::lenient")]
    pub end_time: Option<String>,
}

impl BuildJobStep {
    /// The step's log URL, treating an empty string as absent
    pub fn log_url(&self) -> Option<&str> {
        self.log_url.as_deref().filter(|url| !url.is_empty())
    }

    /// `<stepName>_<status>`, used in file names and skip notices
    pub fn label(&self) -> String {
        format!("{}_{}", self.step_name, self.status)
    }

    /// File name the step's log is written to
    ///
    /// Path separators are replaced so the file always lands directly in the
    /// job folder.
    pub fn log_file_name(&self) -> String {
        format!("{}.txt", path_safe(&self.label()))
    }

    /// Wall-clock duration of the step, if both ends parse
    pub fn duration(&self) -> Option<chrono::Duration> {
        let start: DateTime<Utc> = time::parse(self.start_time.as_deref())?;
        let end = time::parse(self.end_time.as_deref())?;
        Some(end.signed_duration_since(start))
    }
}
