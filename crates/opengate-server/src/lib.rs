//! HTTP surface of the opengate policy service.
//!
//! Wires the policy pipeline to two POST endpoints: `/evaluate` answers
//! access decisions against the active policy, `/generate-policy` authors
//! and persists new policy documents. Health endpoints and a service banner
//! round out the router.

pub mod bootstrap;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use bootstrap::build_state;
pub use observability::{apply_logging_level, init_tracing};
pub use server::{AppState, build_app};
