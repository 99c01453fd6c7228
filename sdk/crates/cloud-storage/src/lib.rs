//! Key/value persistence for SDK state.
//!
//! A [`Storage`] serializes records to JSON and hands the text to a
//! [`StorageStrategy`], which decides where the text lives.

pub mod error;
pub mod file_strategy;
pub mod memory_strategy;
pub mod storage;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use error::{Result as StorageResult, StorageError};
pub use file_strategy::FileStrategy;
pub use memory_strategy::MemoryStrategy;
pub use storage::Storage;
pub use strategy::StorageStrategy;

const DATE_FORMAT: &str = "%Y%m%d_%H%M%S";
const FILE_EXTENSION: &str = "json";
