//! Core domain types for the opengate policy service.
//!
//! This crate defines the two request shapes that cross the HTTP boundary
//! (`AccessRequest` and `PolicySpec`) together with the validation rules
//! a `PolicySpec` must satisfy before it may be rendered into a policy
//! document.

pub mod error;
pub mod request;
pub mod spec;

pub use error::ValidationError;
pub use request::AccessRequest;
pub use spec::PolicySpec;
