use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Port for the HTTP API
    #[arg(long, default_value_t = 8000)]
    pub port: u16,

    /// Directory for the append-only order audit logs
    #[arg(long, default_value = "./logs")]
    pub log_dir: PathBuf,

    /// Path to the rebalance target schedule (JSON, keyed by month start)
    #[arg(long, default_value = "./targets.json")]
    pub targets: PathBuf,
}
