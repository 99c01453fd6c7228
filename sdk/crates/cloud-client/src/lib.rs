//! cloud-client library
//!
//! HTTP client for the platform REST API.

pub(crate) mod client;

#[cfg(test)]
mod tests;

pub use client::{Client, ClientError, ClientResult};
