//! Amplify Logs CLI
//!
//! Downloads the step logs of the most recent headless-app builds of a
//! branch into timestamped local folders.
//!
//! Credentials are read from `KIBO_*` environment variables (a `.env` file
//! in the working directory is loaded first). Every run ends with a `DONE`
//! line, whether or not it succeeded.

mod config;
mod display;
mod download;

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use amplify_client::{AmplifyClient, ApiConfig};
use clap::Parser;
use clap::error::ErrorKind;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, DEFAULT_BRANCH, DEFAULT_LOG_COUNT, DEFAULT_OUTPUT_DIR, DownloadOptions};

#[derive(Parser)]
#[command(name = "amplify-logs")]
#[command(about = "Download build step logs from the headless-app build API", long_about = None)]
struct Cli {
    /// Tenant ID
    #[arg(long, env = "KIBO_TENANT", default_value = "")]
    tenant: String,

    /// Site ID
    #[arg(long, env = "KIBO_SITE", default_value = "")]
    site: String,

    /// Application client ID
    #[arg(long, env = "KIBO_CLIENT_ID", default_value = "")]
    client_id: String,

    /// Application shared secret
    #[arg(long, env = "KIBO_SHARED_SECRET", default_value = "", hide_env_values = true)]
    shared_secret: String,

    /// Host issuing auth tickets
    #[arg(long, env = "KIBO_AUTH_HOST", default_value = "")]
    auth_host: String,

    /// Platform environment name (e.g. sandbox)
    #[arg(long, env = "KIBO_API_ENV", default_value = "")]
    api_env: String,

    /// Override the API host derived from tenant and environment
    #[arg(long, env = "KIBO_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Branch whose builds to download
    #[arg(long, env = "AMPLIFY_BRANCH", default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Number of most recent jobs to pull
    #[arg(long, env = "AMPLIFY_LOG_COUNT", default_value_t = DEFAULT_LOG_COUNT)]
    count: usize,

    /// Folder to create job directories in
    #[arg(long, env = "AMPLIFY_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Exit with a failure code when the run fails
    #[arg(long)]
    strict: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            api: ApiConfig {
                tenant: cli.tenant,
                site: cli.site,
                shared_secret: cli.shared_secret,
                client_id: cli.client_id,
                auth_host: cli.auth_host,
                api_env: cli.api_env,
                base_url: cli.api_base_url,
            },
            download: DownloadOptions {
                branch: cli.branch,
                count: cli.count,
                output_dir: cli.output_dir,
            },
            strict: cli.strict,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amplify_logs=info,amplify_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<OsString> = std::env::args_os().collect();
    let config = match parse_config(&args) {
        Ok(config) => config,
        Err(err) => return download::finish(Err(err), strict_requested(&args)),
    };
    info!(
        branch = %config.download.branch,
        count = config.download.count,
        output_dir = %config.download.output_dir.display(),
        "Starting log download"
    );

    let client = AmplifyClient::new(config.api.clone());
    let result = download::download_latest_logs(&client, &config.download).await;

    download::finish(result, config.strict)
}

/// Parse the command line and environment into a config
///
/// Help and version requests exit through clap as usual. Any other error,
/// such as a malformed `AMPLIFY_LOG_COUNT`, is returned so the run is still
/// reported and finished.
fn parse_config(args: &[OsString]) -> anyhow::Result<Config> {
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Config::from(cli)),
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            err.exit()
        }
        Err(err) => Err(anyhow::Error::new(err).context("Invalid configuration")),
    }
}

/// Whether `--strict` was passed, looked up without a successful parse
fn strict_requested(args: &[OsString]) -> bool {
    args.iter().skip(1).any(|arg| arg == "--strict")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_into_config() {
        let cli = Cli::try_parse_from([
            "amplify-logs",
            "--tenant",
            "100",
            "--site",
            "200",
            "--api-env",
            "sandbox",
            "--branch",
            "release",
            "--count",
            "3",
            "--output-dir",
            "/tmp/amplify",
            "--strict",
        ])
        .unwrap();

        let config = Config::from(cli);
        assert_eq!(config.api.tenant, "100");
        assert_eq!(config.api.site, "200");
        assert_eq!(config.api.api_base_url(), "https://t100.sandbox.mozu.com");
        assert_eq!(config.download.branch, "release");
        assert_eq!(config.download.count, 3);
        assert_eq!(config.download.output_dir, PathBuf::from("/tmp/amplify"));
        assert!(config.strict);
    }

    fn argv(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_invalid_count_is_reported_not_exited() {
        let args = argv(&["amplify-logs", "--count", "abc"]);

        let err = parse_config(&args).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(err.chain().any(|cause| cause.downcast_ref::<clap::Error>().is_some()));
        assert_eq!(download::finish(Err(err), strict_requested(&args)), ExitCode::SUCCESS);
    }

    #[test]
    fn test_strict_survives_parse_failure() {
        let args = argv(&["amplify-logs", "--count", "-3", "--strict"]);

        assert!(parse_config(&args).is_err());
        assert!(strict_requested(&args));
        assert!(!strict_requested(&argv(&["amplify-logs"])));
    }
}
