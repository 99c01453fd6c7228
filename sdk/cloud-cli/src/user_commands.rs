use crate::CliResult;

use clap::Subcommand;
use cloud_user::{Session, User};
use serde_json::{Value, json};

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show the current user
    Show,

    /// Fetch the authenticated user and make it current
    #[command(name = "self")]
    Me,

    /// Fetch any user by id
    Get {
        /// User ID
        id: String,
    },

    /// Set a custom data field on the current user (stored locally)
    Set {
        key: String,
        /// JSON value; anything that is not valid JSON is stored as a string
        value: String,
    },

    /// Remove a custom data field from the current user (stored locally)
    Unset { key: String },

    /// Save the current user to the server
    Save,

    /// Delete the current user on the server
    Delete,

    /// Request a password reset for the current user
    ResetPassword,

    /// Copy custom data from the legacy record into the current user
    Migrate,
}

impl UserCommands {
    pub async fn run(self, session: &Session) -> CliResult<Value> {
        match self {
            UserCommands::Show => {
                let current = session.current()?;
                let user = current.lock().await;
                Ok(user_json(&user))
            }
            UserCommands::Me => {
                let current = User::fetch_self(session).await?;
                let user = current.lock().await;
                Ok(user_json(&user))
            }
            UserCommands::Get { id } => {
                let user = User::load(session, &id).await?;
                Ok(user_json(&user))
            }
            UserCommands::Set { key, value } => {
                let current = session.current()?;
                let mut user = current.lock().await;
                user.set(key, parse_value(&value));
                session.context().store(&user)?;
                Ok(user_json(&user))
            }
            UserCommands::Unset { key } => {
                let current = session.current()?;
                let mut user = current.lock().await;
                user.unset(&key);
                session.context().store(&user)?;
                Ok(user_json(&user))
            }
            UserCommands::Save => {
                let current = session.current()?;
                let mut user = current.lock().await;
                user.save(session).await?;
                Ok(user_json(&user))
            }
            UserCommands::Delete => {
                let current = session.current()?;
                let user = current.lock().await;
                user.delete(session).await?;
                Ok(json!({ "deleted": user.id() }))
            }
            UserCommands::ResetPassword => {
                let current = session.current()?;
                let user = current.lock().await;
                user.reset_password(session).await?;
                Ok(json!({ "password_reset": user.id() }))
            }
            UserCommands::Migrate => {
                let migrated = session.migrate().await?;
                if migrated {
                    let current = session.current()?;
                    let user = current.lock().await;
                    session.context().store(&user)?;
                }
                Ok(json!({ "migrated": migrated }))
            }
        }
    }
}

/// Command-line value: JSON when it parses, else the literal string.
pub fn parse_value(input: &str) -> Value {
    serde_json::from_str(input).unwrap_or_else(|_| Value::String(input.to_string()))
}

/// Printable view of a user.
pub fn user_json(user: &User) -> Value {
    json!({
        "id": user.id(),
        "anonymous": user.is_anonymous(),
        "fresh": user.is_fresh(),
        "dirty": user.is_dirty(),
        "details": user.details(),
        "custom": user.data().to_storage(),
        "pending_unset": user.pending_unset(),
    })
}
