//! Surgery identifiers and sharded-path utilities.
//!
//! Every surgery document is keyed by a *canonical* UUID: **32 lowercase hexadecimal
//! characters** (no hyphens), i.e. what `Uuid::new_v4().simple().to_string()` produces.
//!
//! ## Sharded directory layout
//! For a canonical id `u`, the store keeps the document under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `surgery_data/surgeries/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! Two levels of 256-way fan-out keep any single directory small.

mod shardable;

pub use shardable::ShardableUuid;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// The supplied string is not a canonical identifier.
    #[error("id must be 32 lowercase hex characters without hyphens, got: '{0}'")]
    NotCanonical(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
