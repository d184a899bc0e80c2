//! # API Shared
//!
//! The wire contract between the surgery REST API and its clients.
//!
//! Contains:
//! - JSON request/response models (`wire` module)
//! - The `HealthService` used by the `/health` endpoint
//!
//! Used by `api-rest` to serve requests and by `surgery-client` to make them.

pub mod health;
pub mod wire;

pub use health::{HealthRes, HealthService};
pub use surgery_types::SurgeryStatus;
pub use wire::*;
