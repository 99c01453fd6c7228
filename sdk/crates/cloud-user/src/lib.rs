//! User session, local cache and remote sync.
//!
//! A [`Session`] owns everything the current user depends on: the REST
//! client, the [`UserContext`] persistence boundary, the custom
//! [`DataTypeRegistry`], auth state, the event bus, the usage
//! [`Insights`] tracker and the [`InFlightRegistry`] that keeps at most one
//! load/save/delete running per identity.

pub mod data_type;
pub mod error;
pub mod identity;
pub mod in_flight_guard;
pub mod in_flight_registry;
pub mod insights;
pub mod operation;
pub mod session;
pub mod unique_array;
pub mod user;
pub mod user_context;
pub mod user_data;
pub mod user_record;
pub mod user_value;

#[cfg(test)]
mod tests;

pub use data_type::{CustomData, DataType, DataTypeRegistry};
pub use error::{Result as UserResult, UserError};
pub use identity::Identity;
pub use in_flight_guard::InFlightGuard;
pub use in_flight_registry::InFlightRegistry;
pub use insights::{Insights, STAT_APP_OPENED, STAT_APP_OPENED_PUSH, Stat};
pub use operation::Operation;
pub use session::{Session, SharedUser};
pub use unique_array::UniqueArray;
pub use user::User;
pub use user_context::UserContext;
pub use user_data::UserData;
pub use user_record::{StoredUser, StoredUserData};
pub use user_value::UserValue;

/// Key marking a custom data type in stored records
pub const DATA_TYPE_SCHEMA_TAG: &str = "__Ionic_DataTypeSchema";
/// Key holding the serialized payload next to [`DATA_TYPE_SCHEMA_TAG`]
pub const DATA_TYPE_VALUE_KEY: &str = "value";
/// Custom-data flag set once legacy fields have been copied into the live user
pub const MIGRATED_FLAG: &str = "__ionic_user_migrated";

const STORAGE_KEY_PREFIX: &str = "ionic_io_user_";
const LEGACY_KEY_SUFFIX: &str = "_legacy";
