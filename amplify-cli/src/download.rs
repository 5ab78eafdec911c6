//! Log download flow
//!
//! Lists a branch's build jobs, takes the most recent ones in API order and
//! saves every step log that has a download URL into a per-job folder:
//!
//! ```text
//! <output-dir>/JobID_<jobId>_<timestamp>/<stepName>_<status>.txt
//! ```
//!
//! The flow is strictly sequential. The first error aborts the run; folders
//! already created are left in place.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use amplify_core::domain::step::BuildJobStep;

use amplify_client::{AmplifyClient, ClientError};
use anyhow::{Context, Result};
use chrono::Utc;
use colored::*;
use tracing::{debug, info, warn};

use crate::config::DownloadOptions;
use crate::display;

/// What a successful run produced
#[derive(Debug, Default)]
pub struct DownloadSummary {
    /// Job folders created, in processing order
    pub job_dirs: Vec<PathBuf>,
    /// Step log files written
    pub files_written: Vec<PathBuf>,
    /// `<stepName>_<status>` of steps without a log
    pub skipped_steps: Vec<String>,
}

/// Download the step logs of the latest jobs on the configured branch
pub async fn download_latest_logs(
    client: &AmplifyClient,
    options: &DownloadOptions,
) -> Result<DownloadSummary> {
    let builds = client
        .get_build_jobs(&options.branch)
        .await
        .with_context(|| format!("Failed to list build jobs for branch '{}'", options.branch))?;

    println!(
        "{}",
        format!("Fetching the latest {} jobs.", options.count).bold()
    );

    let jobs = builds.latest(options.count);
    if jobs.len() < options.count {
        warn!(
            requested = options.count,
            available = jobs.len(),
            branch = %options.branch,
            "Fewer jobs available than requested"
        );
    }

    let mut summary = DownloadSummary::default();

    for job in jobs {
        display::print_job_summary(job);

        let job_dir = options.output_dir.join(job.folder_name(Utc::now()));
        create_job_dir(&job_dir).await?;
        summary.job_dirs.push(job_dir.clone());

        let manifest = client
            .get_build_log(&options.branch, &job.job_id)
            .await
            .with_context(|| format!("Failed to fetch log manifest for job {}", job.job_id))?;
        display::print_manifest(&manifest);

        for step in &manifest.steps {
            let Some(log_url) = step.log_url() else {
                println!("{}", skip_notice(step).yellow());
                summary.skipped_steps.push(step.label());
                continue;
            };

            let text = client
                .fetch_log_text(log_url)
                .await
                .with_context(|| format!("Failed to download log for step {}", step.label()))?;

            let path = job_dir.join(step.log_file_name());
            tokio::fs::write(&path, text)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;

            info!(job_id = %job.job_id, path = %path.display(), "Saved step log");
            summary.files_written.push(path);
        }
    }

    Ok(summary)
}

/// Notice printed for a step that has no log to download
fn skip_notice(step: &BuildJobStep) -> String {
    format!("No log file for {}", step.label())
}

/// Create a job folder, creating the output directory first if needed
///
/// The job folder itself must not exist yet.
async fn create_job_dir(job_dir: &Path) -> Result<()> {
    if let Some(parent) = job_dir.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
    }

    tokio::fs::create_dir(job_dir)
        .await
        .with_context(|| format!("Failed to create job directory {}", job_dir.display()))?;
    debug!(path = %job_dir.display(), "Created job directory");

    Ok(())
}

/// Report the outcome of a run and print the final `DONE` marker
///
/// Failures are printed and swallowed: the exit code is only non-zero when
/// `strict` is set.
pub fn finish(result: Result<DownloadSummary>, strict: bool) -> ExitCode {
    report(result, strict, &mut std::io::stdout().lock())
}

fn report(result: Result<DownloadSummary>, strict: bool, out: &mut impl Write) -> ExitCode {
    let failed = match result {
        Ok(summary) => {
            info!(
                jobs = summary.job_dirs.len(),
                files = summary.files_written.len(),
                skipped = summary.skipped_steps.len(),
                "Download finished"
            );
            false
        }
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            if is_auth_error(&err) {
                eprintln!(
                    "{}",
                    "Check the KIBO_* credentials in your environment or .env file.".dimmed()
                );
            }
            true
        }
    };

    // stdout may already be closed; the exit code still reflects the run
    let _ = writeln!(out, "DONE");

    if failed && strict {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn is_auth_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<ClientError>())
        .any(ClientError::is_auth_error)
}
