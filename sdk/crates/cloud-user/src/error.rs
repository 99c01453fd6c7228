use crate::{Identity, Operation};

use std::panic::Location;
use std::time::Duration;

use cloud_client::ClientError;
use cloud_storage::StorageError;
use error_location::ErrorLocation;
use thiserror::Error;

/// Errors raised by user session operations.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Request failed: {source} {location}")]
    Client {
        #[source]
        source: ClientError,
        location: ErrorLocation,
    },

    #[error("Local persistence failed: {source} {location}")]
    Storage {
        #[source]
        source: StorageError,
        location: ErrorLocation,
    },

    #[error("A {operation} operation is already in progress for {identity} {location}")]
    InFlight {
        operation: Operation,
        identity: Identity,
        location: ErrorLocation,
    },

    #[error("Invalid user: {message} {location}")]
    Invalid {
        message: String,
        location: ErrorLocation,
    },

    #[error("{operation} for {identity} timed out after {}ms {location}", .timeout.as_millis())]
    Timeout {
        operation: Operation,
        identity: Identity,
        timeout: Duration,
        location: ErrorLocation,
    },

    #[error("{operation} for {identity} was cancelled {location}")]
    Cancelled {
        operation: Operation,
        identity: Identity,
        location: ErrorLocation,
    },

    #[error("Malformed response: {message} {location}")]
    Malformed {
        message: String,
        location: ErrorLocation,
    },

    #[error("Data type '{schema}': {message} {location}")]
    DataType {
        schema: String,
        message: String,
        location: ErrorLocation,
    },
}

impl UserError {
    #[track_caller]
    pub fn in_flight(operation: Operation, identity: Identity) -> Self {
        Self::InFlight {
            operation,
            identity,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(operation: Operation, identity: Identity, timeout: Duration) -> Self {
        Self::Timeout {
            operation,
            identity,
            timeout,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn cancelled(operation: Operation, identity: Identity) -> Self {
        Self::Cancelled {
            operation,
            identity,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn data_type(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataType {
            schema: schema.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Rejected locally without touching the network: a duplicate in-flight
    /// call or a user that cannot be sent.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::InFlight { .. } | Self::Invalid { .. })
    }

    /// Whether retrying the same call could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Client { source, .. } => source.is_transient(),
            Self::Storage { source, .. } => source.is_transient(),
            Self::Timeout { .. } | Self::InFlight { .. } => true,
            Self::Invalid { .. }
            | Self::Cancelled { .. }
            | Self::Malformed { .. }
            | Self::DataType { .. } => false,
        }
    }

    /// HTTP status of a failed request, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Client { source, .. } => source.status(),
            _ => None,
        }
    }
}

impl From<ClientError> for UserError {
    #[track_caller]
    fn from(source: ClientError) -> Self {
        Self::Client {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<StorageError> for UserError {
    #[track_caller]
    fn from(source: StorageError) -> Self {
        Self::Storage {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, UserError>;
