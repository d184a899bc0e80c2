//! # Surgery Core
//!
//! Core business logic for the surgery manager.
//!
//! This crate contains pure data operations:
//! - The surgery record and its validation rules
//! - Filter-and-sort queries
//! - The file-backed document store under the configured data directory
//!
//! **No API concerns**: HTTP routing, status codes and CORS belong in `api-rest`.

pub mod config;
pub mod constants;
pub mod error;
pub mod query;
pub mod store;
pub mod surgery;

pub use config::{data_dir_from_env_value, CoreConfig};
pub use constants::DEFAULT_SURGERY_DATA_DIR;
pub use error::{SurgeryError, SurgeryResult};
pub use query::SurgeryQuery;
pub use store::SurgeryStore;
pub use surgery::{NewSurgery, Patient, Surgery, SurgeryChanges};
pub use surgery_types::{NonEmptyText, SurgeryStatus};
pub use surgery_uuid::ShardableUuid;
