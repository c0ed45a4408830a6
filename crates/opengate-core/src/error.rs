//! Validation errors for client-supplied policy input.

/// Errors raised while validating a `PolicySpec` or resolving template
/// placeholders against one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required string field was missing or empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Wire name of the offending field.
        field: &'static str,
    },

    /// A required sequence field was empty.
    #[error("{field} must contain at least one entry")]
    EmptySequence {
        /// Wire name of the offending field.
        field: &'static str,
    },

    /// A field value cannot be embedded as a quoted policy literal.
    #[error("{field} contains a raw template delimiter")]
    UnquotableLiteral {
        /// Wire name of the offending field.
        field: &'static str,
    },

    /// The policy template references a key the spec does not provide.
    #[error("template references unknown key: {key}")]
    UnknownTemplateKey {
        /// The placeholder key as written in the template.
        key: String,
    },
}

impl ValidationError {
    /// Creates a new `MissingField` error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Creates a new `EmptySequence` error.
    #[must_use]
    pub fn empty_sequence(field: &'static str) -> Self {
        Self::EmptySequence { field }
    }

    /// Creates a new `UnquotableLiteral` error.
    #[must_use]
    pub fn unquotable_literal(field: &'static str) -> Self {
        Self::UnquotableLiteral { field }
    }

    /// Creates a new `UnknownTemplateKey` error.
    #[must_use]
    pub fn unknown_template_key(key: impl Into<String>) -> Self {
        Self::UnknownTemplateKey { key: key.into() }
    }
}
