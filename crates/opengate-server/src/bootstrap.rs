//! Process bootstrap: store selection, template loading and the initial
//! policy load.
//!
//! Startup failures here are deliberately non-fatal: a process that cannot
//! load its active policy still serves `/generate-policy`, and `/evaluate`
//! answers 500 until a successful hot-reload or restart. The store stays
//! authoritative either way.

use std::sync::Arc;

use opengate_config::{AppConfig, StorageBackend};
use opengate_policy::{ActivePolicy, DEFAULT_TEMPLATE, DecisionEngine, PolicyAuthoring};
use opengate_storage::{DynPolicyStore, MemoryPolicyStore, S3Options, S3PolicyStore};

use crate::server::AppState;

/// Builds the configured policy store backend.
pub async fn create_store(cfg: &AppConfig) -> DynPolicyStore {
    match cfg.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory policy store");
            Arc::new(MemoryPolicyStore::new())
        }
        StorageBackend::S3 => {
            let s3 = &cfg.storage.s3;
            let options = S3Options {
                region: s3.region.clone(),
                endpoint_url: s3.endpoint_url.clone(),
                profile: s3.profile.clone(),
                force_path_style: s3.use_path_style(),
            };
            Arc::new(S3PolicyStore::connect(s3.bucket.clone(), options).await)
        }
    }
}

/// Reads the policy template from disk, falling back to the built-in copy.
pub async fn load_template(cfg: &AppConfig) -> String {
    match tokio::fs::read_to_string(&cfg.policy.template_path).await {
        Ok(template) => {
            tracing::info!(path = %cfg.policy.template_path, "loaded policy template");
            template
        }
        Err(e) => {
            tracing::warn!(
                path = %cfg.policy.template_path,
                error = %e,
                "policy template unavailable, using built-in template"
            );
            DEFAULT_TEMPLATE.to_string()
        }
    }
}

/// Fetches, compiles and publishes the active policy object.
///
/// A missing object is expected on first boot; anything else is logged at
/// ERROR. In both cases the server keeps starting.
pub async fn load_initial_policy(store: &DynPolicyStore, active: &ActivePolicy, cfg: &AppConfig) {
    let key = &cfg.policy.active_object_key;
    let bytes = match store.fetch(key).await {
        Ok(bytes) => bytes,
        Err(e) if e.is_not_found() => {
            tracing::warn!(key = %key, "no active policy object in store yet");
            return;
        }
        Err(e) => {
            tracing::error!(key = %key, error = %e, "failed to fetch active policy");
            return;
        }
    };

    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(key = %key, error = %e, "active policy object is not UTF-8");
            return;
        }
    };

    match active.publish(&source, &cfg.policy.query_path).await {
        Ok(()) => tracing::info!(key = %key, "active policy loaded from store"),
        Err(e) => {
            tracing::error!(key = %key, error = %e, "failed to compile active policy")
        }
    }
}

/// Assembles the full application state from configuration.
pub async fn build_state(cfg: &AppConfig) -> AppState {
    let store = create_store(cfg).await;
    let template = load_template(cfg).await;

    let active = Arc::new(ActivePolicy::new());
    load_initial_policy(&store, &active, cfg).await;

    let decisions = Arc::new(DecisionEngine::new(active.clone()));
    let authoring = Arc::new(PolicyAuthoring::new(
        store,
        active,
        template,
        cfg.policy.query_path.clone(),
        cfg.policy.hot_reload,
    ));

    AppState {
        decisions,
        authoring,
    }
}
