use crate::{CliError, CliResult};

use clap::Subcommand;
use cloud_user::Session;
use serde_json::{Value, json};

#[derive(Subcommand, Debug)]
pub enum PushCommands {
    /// Parse a push plugin notification payload
    Parse {
        /// Notification JSON as delivered by the push plugin
        json: String,
    },
}

impl PushCommands {
    pub fn run(self, session: &Session) -> CliResult<Value> {
        match self {
            PushCommands::Parse { json } => {
                let raw: Value =
                    serde_json::from_str(&json).map_err(|source| CliError::InvalidJson {
                        input: json.clone(),
                        source,
                    })?;
                let message = session.handle_push(raw);

                Ok(json!({
                    "title": message.title,
                    "text": message.text,
                    "count": message.count,
                    "sound": message.sound,
                    "image": message.image,
                    "app": {
                        "asleep": message.app.was_asleep(),
                        "closed": message.app.was_closed(),
                    },
                    "payload": message.payload(),
                }))
            }
        }
    }
}
