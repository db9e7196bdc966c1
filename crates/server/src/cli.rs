use std::{path::PathBuf, time::Duration};

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(name = "exercise-tracker")]
pub struct Cli {
    #[clap(long, env, default_value = "assets")]
    pub assets_dir: PathBuf,
    #[clap(long, env, default_value = "exercise.sqlite")]
    pub sqlite_connection_string: String,
    #[clap(long, env, default_value = "3000")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
    /// Upper bound on waiting for a pooled database connection
    #[clap(long, env, default_value = "5000")]
    pub database_timeout_ms: u64,
    #[clap(long, env, default_value = "16384")]
    pub max_body_bytes: usize,
    /// Only allow cross-origin requests from this origin. Any origin is
    /// allowed when unset
    #[arg(long, env)]
    pub cors_origin: Option<String>,

    /// Keep everything in memory instead of SQLite. Data is lost on exit
    #[arg(long, env, default_value = "false")]
    pub in_memory: bool,
}

impl Cli {
    pub fn database_timeout(&self) -> Duration {
        Duration::from_millis(self.database_timeout_ms)
    }
}
