//! The process-wide active policy cell.
//!
//! Holds the one live `CompiledPolicy` behind an `ArcSwapOption`, giving
//! decision paths lock-free snapshot reads and publication a single atomic
//! pointer swap. Writers are serialized by an async mutex held across
//! compile + swap, so the published reference is always the product of one
//! complete compile; the lock is never held across network I/O (callers
//! fetch source before publishing).

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::Mutex;

use crate::engine::CompiledPolicy;
use crate::error::PolicyError;

/// Swappable owner of the currently active compiled policy.
#[derive(Debug, Default)]
pub struct ActivePolicy {
    current: ArcSwapOption<CompiledPolicy>,
    publish_lock: Mutex<()>,
}

impl ActivePolicy {
    /// Creates a cell with no policy published.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock-free snapshot of the current policy, if one was ever published.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<CompiledPolicy>> {
        self.current.load_full()
    }

    /// Returns `true` once a policy has been successfully published.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Compiles `source` and atomically publishes the result.
    ///
    /// On failure the previously published policy (if any) stays in effect;
    /// readers never observe a partially updated handle.
    pub async fn publish(&self, source: &str, query_path: &str) -> Result<(), PolicyError> {
        let _guard = self.publish_lock.lock().await;
        let compiled = CompiledPolicy::compile(source, query_path)?;
        self.current.store(Some(Arc::new(compiled)));
        tracing::info!(query_path, "published new active policy");
        Ok(())
    }
}
