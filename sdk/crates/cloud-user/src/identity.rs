use std::fmt;

use uuid::Uuid;

/// Who an in-flight operation is about.
///
/// Users with an id are keyed by that id, so two instances of the same user
/// exclude each other. Anonymous users only exclude themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// The authenticated caller, resolved by the server (`/auth/users/self`)
    Caller,
    Id(String),
    /// An anonymous in-memory instance
    Instance(Uuid),
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Caller => f.write_str("self"),
            Self::Id(id) => write!(f, "user:{id}"),
            Self::Instance(instance) => write!(f, "anonymous:{instance}"),
        }
    }
}
