//! Policy authoring and evaluation for opengate.
//!
//! The pipeline has two directions. Authoring turns a validated
//! [`PolicySpec`](opengate_core::PolicySpec) into Rego source via the
//! template renderer, persists it to the policy store, and optionally
//! publishes it as the live policy. Decisions evaluate an
//! [`AccessRequest`](opengate_core::AccessRequest) against whatever policy
//! is currently published, through a lock-free snapshot of the compiled
//! engine.
//!
//! The Rego language itself is the engine's business; this crate only
//! hands it source text and interprets the single boolean it returns.

pub mod active;
pub mod authoring;
pub mod decision;
pub mod engine;
pub mod error;
pub mod template;

pub use active::ActivePolicy;
pub use authoring::{AuthoredPolicy, PolicyAuthoring};
pub use decision::{Decision, DecisionEngine};
pub use engine::{CompiledPolicy, DEFAULT_QUERY_PATH};
pub use error::PolicyError;
pub use template::{DEFAULT_TEMPLATE, render};
