//! The policy authoring service.
//!
//! Orchestrates validate → render → persist, and optionally republishes the
//! freshly authored document as the live policy. Persistence is the point of
//! no return: once the store write succeeds the operation is a success, and
//! a hot-reload failure is reported as a warning rather than an error since
//! the store is the source of truth for the next full reload cycle.

use std::sync::Arc;

use opengate_core::PolicySpec;
use opengate_storage::DynPolicyStore;

use crate::active::ActivePolicy;
use crate::error::PolicyError;
use crate::template;

const POLICY_CONTENT_TYPE: &str = "text/plain";

/// Result of a successful authoring operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredPolicy {
    /// Store key the rendered document was persisted under.
    pub key: String,
    /// Present when persistence succeeded but hot-reload did not.
    pub reload_warning: Option<String>,
}

/// Validates, renders, persists and optionally hot-reloads policies.
pub struct PolicyAuthoring {
    store: DynPolicyStore,
    active: Arc<ActivePolicy>,
    template: String,
    query_path: String,
    hot_reload: bool,
}

impl PolicyAuthoring {
    /// Creates a service rendering `template` and publishing through
    /// `active` when `hot_reload` is set.
    pub fn new(
        store: DynPolicyStore,
        active: Arc<ActivePolicy>,
        template: String,
        query_path: impl Into<String>,
        hot_reload: bool,
    ) -> Self {
        Self {
            store,
            active,
            template,
            query_path: query_path.into(),
            hot_reload,
        }
    }

    /// Authors one policy document from `spec`.
    ///
    /// Authoring the same spec twice writes byte-identical content under the
    /// same key; the store's overwrite semantics make retries safe.
    ///
    /// # Errors
    ///
    /// `Validation` for incomplete specs, `Render` for template defects,
    /// `Storage` when the document could not be persisted. Hot-reload
    /// failures are not errors (see `AuthoredPolicy::reload_warning`).
    pub async fn author_policy(&self, spec: &PolicySpec) -> Result<AuthoredPolicy, PolicyError> {
        spec.validate()?;
        let document = template::render(spec, &self.template)?;
        let key = spec.object_key();

        self.store
            .put(&key, document.clone().into_bytes(), POLICY_CONTENT_TYPE)
            .await?;
        tracing::info!(
            key = %key,
            backend = self.store.backend_name(),
            "policy document persisted"
        );

        let reload_warning = if self.hot_reload {
            match self.active.publish(&document, &self.query_path).await {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        key = %key,
                        "hot-reload failed; previously active policy remains in effect"
                    );
                    Some(e.to_string())
                }
            }
        } else {
            None
        };

        Ok(AuthoredPolicy {
            key,
            reload_warning,
        })
    }
}
