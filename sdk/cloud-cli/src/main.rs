//! cloud - platform user session CLI
//!
//! # Examples
//!
//! ```bash
//! # Fetch the signed-in user and cache it locally
//! CLOUD_AUTH_TOKEN=... cloud user self --pretty
//!
//! # Change a custom field and push it
//! cloud user set plan '"pro"'
//! cloud user save
//! ```

use cloud_cli::{Cli, CliResult, logger};
use cloud_config::{Config, LogLevel};
use cloud_user::{DataTypeRegistry, Session};

use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};
use serde_json::Value;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let pretty = cli.pretty;

    if let Some(ref dir) = cli.config_dir {
        // SAFETY: no other threads exist before the runtime is built
        unsafe { std::env::set_var("CLOUD_CONFIG_DIR", dir) };
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(cli)) {
        Ok(value) => {
            let output = if pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            };

            match output {
                Ok(json) => {
                    println!("{}", json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error serializing response: {}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> CliResult<Value> {
    let mut config = Config::load()?;
    if let Some(ref level) = cli.log_level {
        config.logging.level = LogLevel::parse_lenient(level);
    }
    config.validate()?;

    logger::initialize(
        config.logging.level,
        logger::log_file_path(&config)?,
        config.logging.colored,
    )?;

    info!("Starting cloud v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let session = Session::from_config(&config, DataTypeRegistry::new())?;
    let output = cloud_cli::run(cli.command, &session).await;

    // The process exits before the background submitter would fire
    if let Err(e) = session.insights().submit().await {
        warn!("Dropping {} unsent insight(s): {e}", session.insights().pending());
    }

    output
}
