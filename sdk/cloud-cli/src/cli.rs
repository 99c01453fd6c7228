use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "cloud")]
#[command(about = "Inspect and sync the current platform user")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory (overrides CLOUD_CONFIG_DIR)
    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Log level for this run (overrides logging.level)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
