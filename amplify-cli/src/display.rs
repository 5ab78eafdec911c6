//! Console output for jobs and step manifests

use amplify_core::domain::job::BuildJob;
use amplify_core::domain::step::BuildJobStep;
use amplify_core::dto::build::BuildJobLogResponse;
use chrono::{DateTime, Utc};
use colored::*;

/// Print a job as it is picked up
pub fn print_job_summary(job: &BuildJob) {
    println!("  {} Job {}", "▸".cyan(), job.job_id.bold());
    println!("    Status:   {}", colorize_status(&job.status));
    if let Some(commit) = &job.commit_id {
        println!("    Commit:   {}", commit.dimmed());
    }
    println!("    Started:  {}", format_time(job.started_at()));
    println!("    Ended:    {}", format_time(job.ended_at()));
    if let Some(duration) = job.duration() {
        println!("    Duration: {}s", duration.num_seconds());
    }
    println!();
}

/// Print the steps of a job's log manifest
pub fn print_manifest(manifest: &BuildJobLogResponse) {
    println!(
        "{}",
        format!(
            "Job {} has {} step(s):",
            manifest.job_id,
            manifest.steps.len()
        )
        .bold()
    );
    for step in &manifest.steps {
        print_step(step);
    }
    println!();
}

fn print_step(step: &BuildJobStep) {
    let marker = if step.log_url().is_some() {
        "✓".green()
    } else {
        "-".dimmed()
    };

    println!(
        "  {} {:<24} {}",
        marker,
        step.step_name,
        colorize_status(&step.status)
    );
}

/// Colorize a platform status for display
///
/// Statuses are free-form strings; unknown ones are shown uncolored.
fn colorize_status(status: &str) -> ColoredString {
    match status.to_ascii_uppercase().as_str() {
        "SUCCEED" | "SUCCEEDED" | "SUCCESS" => status.green(),
        "FAILED" | "FAILURE" => status.red(),
        "PENDING" | "PROVISIONING" | "RUNNING" => status.cyan(),
        "CANCELLING" | "CANCELLED" | "SKIPPED" => status.dimmed(),
        _ => status.normal(),
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
