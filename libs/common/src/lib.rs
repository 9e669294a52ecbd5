//! Common library for the back office service
//!
//! This crate provides the pieces shared by the auth and api crates: the
//! flat-file record store, the response envelope, the shared error type and
//! configuration loading.

pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod store;

pub use error::{ApiError, ApiResult, StoreError, StoreResult};
pub use extract::JsonBody;
pub use response::Envelope;
pub use store::{JsonFileStore, Record, Repository};
