//! # Surgery Client
//!
//! Client side of the surgery manager:
//! - [`SurgeryClient`], a typed HTTP client for the REST API
//! - [`Route`], navigation between the list and a single record
//! - [`ListView`], sorting and pagination over the upcoming list
//! - [`DetailView`], the edit buffer for one record, with save and discard
//!
//! View state is plain data driven by async calls, so any front end (the `surgery` CLI, a TUI,
//! tests) can render it.

mod api;
mod error;

pub mod detail;
pub mod form;
pub mod list;
pub mod route;

pub use api::{SurgeryClient, DEFAULT_API_URL};
pub use detail::{DetailView, Discard, SaveRequest};
pub use error::{ClientError, ClientResult};
pub use form::{Field, SurgeryForm};
pub use list::{Column, ListView, Sort, SortDirection, DEFAULT_PAGE_SIZE, PAGE_SIZES};
pub use route::{DetailTarget, Route, NEW_SENTINEL};
