//! The policy-authoring input shape and its validation rules.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A structured description of one application's access rules, used to
/// generate a policy document.
///
/// All scalar fields are required and non-empty; both sequences must carry
/// at least one entry. Values may contain quotes and backslashes (they are
/// escaped at render time), but raw template delimiters are rejected so a
/// spec can never smuggle placeholder syntax into a rendered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySpec {
    pub application_name: String,
    pub environment: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub api_name: String,
    pub api_version: String,
    pub allowed_actions: Vec<String>,
    pub allowed_attributes: Vec<String>,
}

impl PolicySpec {
    /// Checks the completeness invariants before any rendering happens.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let scalars: [(&'static str, &str); 5] = [
            ("applicationName", &self.application_name),
            ("environment", &self.environment),
            ("clientID", &self.client_id),
            ("apiName", &self.api_name),
            ("apiVersion", &self.api_version),
        ];
        for (field, value) in scalars {
            if value.trim().is_empty() {
                return Err(ValidationError::missing_field(field));
            }
            if contains_delimiter(value) {
                return Err(ValidationError::unquotable_literal(field));
            }
        }

        let sequences: [(&'static str, &[String]); 2] = [
            ("allowedActions", &self.allowed_actions),
            ("allowedAttributes", &self.allowed_attributes),
        ];
        for (field, values) in sequences {
            if values.is_empty() {
                return Err(ValidationError::empty_sequence(field));
            }
            if values.iter().any(|v| contains_delimiter(v)) {
                return Err(ValidationError::unquotable_literal(field));
            }
        }
        Ok(())
    }

    /// Deterministic object key under which the rendered document is stored.
    #[must_use]
    pub fn object_key(&self) -> String {
        format!(
            "policies/{}_{}_{}.rego",
            self.application_name, self.api_name, self.api_version
        )
    }
}

fn contains_delimiter(value: &str) -> bool {
    value.contains("{{") || value.contains("}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billing_spec() -> PolicySpec {
        PolicySpec {
            application_name: "billing".into(),
            environment: "prod".into(),
            client_id: "c1".into(),
            api_name: "invoices".into(),
            api_version: "v1".into(),
            allowed_actions: vec!["read".into(), "write".into()],
            allowed_attributes: vec!["amount".into(), "dueDate".into()],
        }
    }

    #[test]
    fn test_valid_spec_passes() {
        assert!(billing_spec().validate().is_ok());
    }

    #[test]
    fn test_empty_scalar_rejected() {
        let mut spec = billing_spec();
        spec.environment = "  ".into();
        assert_eq!(
            spec.validate(),
            Err(ValidationError::missing_field("environment"))
        );
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let mut spec = billing_spec();
        spec.allowed_attributes.clear();
        assert_eq!(
            spec.validate(),
            Err(ValidationError::empty_sequence("allowedAttributes"))
        );
    }

    #[test]
    fn test_template_delimiter_rejected() {
        let mut spec = billing_spec();
        spec.allowed_actions = vec!["{{ .ClientID }}".into()];
        assert_eq!(
            spec.validate(),
            Err(ValidationError::unquotable_literal("allowedActions"))
        );
    }

    #[test]
    fn test_embedded_quote_is_valid_input() {
        let mut spec = billing_spec();
        spec.allowed_actions = vec![r#"read"latest"#.into()];
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_object_key() {
        assert_eq!(
            billing_spec().object_key(),
            "policies/billing_invoices_v1.rego"
        );
    }

    #[test]
    fn test_wire_names() {
        let spec = billing_spec();
        let out = serde_json::to_value(&spec).unwrap();
        assert!(out.get("clientID").is_some());
        assert!(out.get("allowedActions").is_some());
        assert!(out.get("allowedAttributes").is_some());
    }
}
