use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] cloud_config::ConfigError),

    #[error("{0}")]
    User(#[from] cloud_user::UserError),

    #[error("Invalid JSON argument '{input}': {source}")]
    InvalidJson {
        input: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to prepare log output: {message}")]
    Logger { message: String },
}

pub type Result<T> = std::result::Result<T, CliError>;
