//! Access decision evaluation against the active policy.

use std::sync::Arc;

use opengate_core::AccessRequest;

use crate::active::ActivePolicy;
use crate::error::PolicyError;

/// Outcome of an access decision. Errors are surfaced separately and are
/// never collapsed into `Deny`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    /// Returns `true` for `Allow`.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Evaluates access requests against the currently published policy.
///
/// Holds nothing mutable itself; every call reads one snapshot of the
/// active policy and works only with that.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    active: Arc<ActivePolicy>,
}

impl DecisionEngine {
    /// Creates an engine reading from `active`.
    #[must_use]
    pub fn new(active: Arc<ActivePolicy>) -> Self {
        Self { active }
    }

    /// Decides `request` against the active policy.
    ///
    /// # Errors
    ///
    /// `NoActivePolicy` when nothing has ever been published;
    /// `Evaluation` when the engine fails or answers with anything but a
    /// boolean.
    pub fn decide(&self, request: &AccessRequest) -> Result<Decision, PolicyError> {
        let policy = self.active.snapshot().ok_or(PolicyError::NoActivePolicy)?;
        let input = serde_json::to_value(request)
            .map_err(|e| PolicyError::evaluation(e.to_string()))?;
        let allowed = policy.evaluate(&input)?;
        tracing::debug!(
            application = %request.application_name,
            action = %request.action,
            allowed,
            "access request evaluated"
        );
        Ok(if allowed { Decision::Allow } else { Decision::Deny })
    }
}
