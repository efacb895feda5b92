use std::num::NonZeroUsize;
use std::path::PathBuf;
use clap::Args;
use pv_client::DEFAULT_HOSTNAME;
use pv_core::{Error, Result};

pub const APP_DIR: &str = "pubvis";

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Base URL of the backend API
    #[arg(long, global = true, env = "PV_HOSTNAME", default_value = DEFAULT_HOSTNAME)]
    pub hostname: String,
    /// Directory for history and cookies (defaults to the platform data directory)
    #[arg(long, global = true, env = "PV_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
    /// Local storage backend: file or memory
    #[arg(long, global = true, env = "PV_STORAGE", default_value = "file")]
    pub storage: String,
    /// Keep only the N most recently viewed articles (unbounded by default)
    #[arg(long, global = true, env = "PV_HISTORY_LIMIT")]
    pub history_limit: Option<NonZeroUsize>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub hostname: String,
    pub data_dir: PathBuf,
    pub storage: String,
    pub history_limit: Option<NonZeroUsize>,
}

impl Config {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let data_dir = match &args.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or_else(|| Error::Config("No data directory found, pass --data-dir".to_string()))?,
        };

        Ok(Self {
            hostname: args.hostname.trim_end_matches('/').to_string(),
            data_dir,
            storage: args.storage.clone(),
            history_limit: args.history_limit,
        })
    }
}
