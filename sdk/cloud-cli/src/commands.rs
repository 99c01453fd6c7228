use crate::{CliResult, push_commands::PushCommands, user_commands::UserCommands};

use clap::Subcommand;
use cloud_user::Session;
use serde_json::Value;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Current user operations
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Push notification helpers
    Push {
        #[command(subcommand)]
        action: PushCommands,
    },
}

/// Execute `command` against `session`, returning the JSON to print.
pub async fn run(command: Commands, session: &Session) -> CliResult<Value> {
    match command {
        Commands::User { action } => action.run(session).await,
        Commands::Push { action } => action.run(session),
    }
}
