//! Object storage abstraction for opengate policy documents.
//!
//! Policy documents are opaque blobs addressed by deterministic keys. This
//! crate defines the `PolicyStore` trait all backends implement, an S3
//! backend for production, and an in-memory backend used by tests and local
//! development.

pub mod error;
pub mod memory;
pub mod s3;
pub mod traits;

pub use error::StorageError;
pub use memory::MemoryPolicyStore;
pub use s3::{S3Options, S3PolicyStore};
pub use traits::PolicyStore;

/// Type alias for a shareable `PolicyStore` instance.
pub type DynPolicyStore = std::sync::Arc<dyn PolicyStore>;
