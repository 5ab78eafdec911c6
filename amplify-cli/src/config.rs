//! Configuration module
//!
//! Handles CLI configuration: tenant credentials plus what to download and
//! where to put it.

use std::path::PathBuf;

use amplify_client::ApiConfig;

/// Branch whose builds are downloaded when none is given
pub const DEFAULT_BRANCH: &str = "kibo-sb-main";

/// Number of most recent jobs to pull when none is given
pub const DEFAULT_LOG_COUNT: usize = 1;

/// Folder job directories are created in when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "./logs";

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Tenant credentials and API location
    pub api: ApiConfig,
    pub download: DownloadOptions,
    /// Exit non-zero when the run fails
    pub strict: bool,
}

/// What to download and where to write it
#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub branch: String,
    /// How many of the most recent jobs to pull
    pub count: usize,
    pub output_dir: PathBuf,
}
