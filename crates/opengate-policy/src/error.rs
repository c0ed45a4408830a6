//! Error taxonomy for the policy pipeline.

use opengate_core::ValidationError;
use opengate_storage::StorageError;

/// Errors that can occur while authoring, compiling or evaluating policies.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// Client input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The template could not be rendered.
    #[error("template render failed: {message}")]
    Render {
        /// Diagnostic from the renderer.
        message: String,
    },

    /// The rule engine rejected the policy source.
    #[error("policy compilation failed: {message}")]
    Compile {
        /// Diagnostic from the rule engine.
        message: String,
    },

    /// The rule engine produced no result, a non-boolean result, or failed
    /// during evaluation. Distinct from a Deny decision.
    #[error("policy evaluation failed: {message}")]
    Evaluation {
        /// Diagnostic from the rule engine.
        message: String,
    },

    /// No policy has ever been successfully published in this process.
    #[error("no active policy has been loaded")]
    NoActivePolicy,

    /// The policy store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PolicyError {
    /// Creates a new `Render` error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Creates a new `Compile` error.
    #[must_use]
    pub fn compile(message: impl Into<String>) -> Self {
        Self::Compile {
            message: message.into(),
        }
    }

    /// Creates a new `Evaluation` error.
    #[must_use]
    pub fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation {
            message: message.into(),
        }
    }

    /// Returns `true` if this error is the caller's fault (HTTP 400).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_passthrough() {
        let err: PolicyError = ValidationError::missing_field("apiName").into();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "missing required field: apiName");
    }

    #[test]
    fn test_engine_errors_are_not_validation() {
        assert!(!PolicyError::compile("bad token").is_validation());
        assert!(!PolicyError::NoActivePolicy.is_validation());
    }
}
