//! cloud-cli library
//!
//! Command definitions and dispatch, exported for the binary and tests.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod push_commands;
pub mod user_commands;


pub use cli::Cli;
pub use commands::{Commands, run};
pub use error::{CliError, Result as CliResult};
pub use push_commands::PushCommands;
pub use user_commands::UserCommands;
