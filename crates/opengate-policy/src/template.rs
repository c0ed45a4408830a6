//! Policy document template rendering.
//!
//! Templates use `{{ .Key }}` placeholders. Every substituted value is the
//! JSON serialization of the spec field: scalars become quoted string
//! literals, sequences become quoted comma-separated array literals. Both
//! are valid Rego literals as well. Rendering is code
//! generation, so values are never spliced in raw: the JSON escaping is what
//! keeps a quote inside an action name from terminating the literal early.

use std::collections::BTreeMap;

use opengate_core::{PolicySpec, ValidationError};
use serde_json::Value;

use crate::error::PolicyError;

/// The built-in access policy template, also shipped at
/// `policies/access_policy.rego.tmpl` for deployments that want to edit it.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/access_policy.rego.tmpl");

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Renders `template` with the fields of `spec`.
///
/// Pure function of its inputs: no I/O, no side effects.
///
/// # Errors
///
/// `ValidationError` when the spec is incomplete or the template references
/// a key the spec does not provide; `Render` when the template syntax
/// itself is malformed.
pub fn render(spec: &PolicySpec, template: &str) -> Result<String, PolicyError> {
    spec.validate()?;
    let values = substitutions(spec);

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + OPEN.len()..];
        let Some(end) = after.find(CLOSE) else {
            return Err(PolicyError::render("unterminated placeholder delimiter"));
        };
        let key = placeholder_key(&after[..end])?;
        let value = values
            .get(key)
            .ok_or_else(|| ValidationError::unknown_template_key(key))?;
        out.push_str(value);
        rest = &after[end + CLOSE.len()..];
    }
    if rest.contains(CLOSE) {
        return Err(PolicyError::render("unmatched closing delimiter"));
    }
    out.push_str(rest);
    Ok(out)
}

/// Extracts the key from the inside of a `{{ .Key }}` placeholder.
fn placeholder_key(raw: &str) -> Result<&str, PolicyError> {
    let expr = raw.trim();
    let key = expr
        .strip_prefix('.')
        .ok_or_else(|| PolicyError::render(format!("malformed placeholder expression '{expr}'")))?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(PolicyError::render(format!(
            "malformed placeholder key '{key}'"
        )));
    }
    Ok(key)
}

/// Substitution values, each already serialized as a policy-language literal.
fn substitutions(spec: &PolicySpec) -> BTreeMap<&'static str, String> {
    let quoted = |s: &str| Value::String(s.to_owned()).to_string();
    let list = |items: &[String]| Value::from(items.to_vec()).to_string();

    BTreeMap::from([
        ("ApplicationName", quoted(&spec.application_name)),
        ("Environment", quoted(&spec.environment)),
        ("ClientID", quoted(&spec.client_id)),
        ("ApiName", quoted(&spec.api_name)),
        ("ApiVersion", quoted(&spec.api_version)),
        ("AllowedActions", list(&spec.allowed_actions)),
        ("AllowedAttributes", list(&spec.allowed_attributes)),
    ])
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
    fn test_renders_default_template() {
        let doc = render(&billing_spec(), DEFAULT_TEMPLATE).unwrap();
        assert!(doc.contains("package api.access"));
        assert!(doc.contains(r#"input.applicationName == "billing""#));
        assert!(doc.contains(r#"allowed_actions := ["read","write"]"#));
        assert!(doc.contains(r#"allowed_attributes := ["amount","dueDate"]"#));
        assert!(!doc.contains("{{"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let a = render(&billing_spec(), DEFAULT_TEMPLATE).unwrap();
        let b = render(&billing_spec(), DEFAULT_TEMPLATE).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_quotes_are_escaped_not_spliced() {
        let mut spec = billing_spec();
        spec.allowed_actions = vec![r#"re"ad"#.into()];
        let doc = render(&spec, DEFAULT_TEMPLATE).unwrap();
        assert!(doc.contains(r#"allowed_actions := ["re\"ad"]"#));
    }

    #[test]
    fn test_empty_field_fails_validation() {
        let mut spec = billing_spec();
        spec.api_name = String::new();
        let err = render(&spec, DEFAULT_TEMPLATE).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_unknown_key_fails_validation() {
        let err = render(&billing_spec(), "package p\n\nx := {{ .Tenant }}\n").unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Validation(ValidationError::UnknownTemplateKey { .. })
        ));
    }

    #[test]
    fn test_unterminated_placeholder_is_render_error() {
        let err = render(&billing_spec(), "x := {{ .ApiName\n").unwrap_err();
        assert!(matches!(err, PolicyError::Render { .. }));
    }

    #[test]
    fn test_placeholder_without_dot_is_render_error() {
        let err = render(&billing_spec(), "x := {{ ApiName }}\n").unwrap_err();
        assert!(matches!(err, PolicyError::Render { .. }));
    }

    #[test]
    fn test_stray_close_is_render_error() {
        let err = render(&billing_spec(), "x := .ApiName }}\n").unwrap_err();
        assert!(matches!(err, PolicyError::Render { .. }));
    }
}
