//! The compiled policy handle around the Rego engine.
//!
//! The engine is a black box: it takes policy source plus a query path and
//! answers with a value. Everything language-level (parsing, type checking,
//! builtins) lives inside `regorus`.

use serde_json::Value as JsonValue;

use crate::error::PolicyError;

/// Query evaluated against compiled policies unless configuration says
/// otherwise.
pub const DEFAULT_QUERY_PATH: &str = "data.api.access.allow";

/// Module name handed to the engine for diagnostics.
const POLICY_MODULE: &str = "policy.rego";

/// A prepared, reusable compiled query.
///
/// Immutable once built; evaluation clones the underlying engine, so one
/// `CompiledPolicy` may be shared read-only across any number of concurrent
/// evaluations.
#[derive(Clone)]
pub struct CompiledPolicy {
    engine: regorus::Engine,
    query_path: String,
}

impl std::fmt::Debug for CompiledPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledPolicy")
            .field("query_path", &self.query_path)
            .finish()
    }
}

impl CompiledPolicy {
    /// Parses `source` and prepares `query_path` for evaluation.
    ///
    /// A probe evaluation against an empty input runs at compile time, so a
    /// query path that resolves to nothing is rejected here rather than on
    /// the first live decision.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Compile` carrying the engine's diagnostic.
    pub fn compile(source: &str, query_path: &str) -> Result<Self, PolicyError> {
        let mut engine = regorus::Engine::new();
        engine
            .add_policy(POLICY_MODULE.to_string(), source.to_string())
            .map_err(|e| PolicyError::compile(e.to_string()))?;

        let compiled = Self {
            engine,
            query_path: query_path.to_string(),
        };
        let probe = compiled.query_results(&JsonValue::Object(Default::default()))?;
        if probe.result.is_empty() {
            return Err(PolicyError::compile(format!(
                "query '{query_path}' produced no result"
            )));
        }
        Ok(compiled)
    }

    /// The query path this policy was prepared for.
    #[must_use]
    pub fn query_path(&self) -> &str {
        &self.query_path
    }

    /// Evaluates the prepared query against `input` and interprets the
    /// single boolean result.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Evaluation` when the engine fails, returns no
    /// result, or returns a non-boolean value. None of these are a Deny.
    pub fn evaluate(&self, input: &JsonValue) -> Result<bool, PolicyError> {
        let results = self.query_results(input).map_err(|e| match e {
            PolicyError::Compile { message } => PolicyError::evaluation(message),
            other => other,
        })?;
        let first = results
            .result
            .first()
            .ok_or_else(|| PolicyError::evaluation("no result from policy evaluation"))?;
        let expression = first
            .expressions
            .first()
            .ok_or_else(|| PolicyError::evaluation("no expression value at query path"))?;
        match &expression.value {
            regorus::Value::Bool(allowed) => Ok(*allowed),
            other => Err(PolicyError::evaluation(format!(
                "non-boolean result at query path: {other:?}"
            ))),
        }
    }

    fn query_results(&self, input: &JsonValue) -> Result<regorus::QueryResults, PolicyError> {
        let input = regorus::Value::from_json_str(&input.to_string())
            .map_err(|e| PolicyError::evaluation(e.to_string()))?;
        let mut engine = self.engine.clone();
        engine.set_input(input);
        engine
            .eval_query(self.query_path.clone(), false)
            .map_err(|e| PolicyError::compile(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const POLICY: &str = r#"
package api.access

default allow = false

allow {
    input.clientID == "c1"
}
"#;

    #[test]
    fn test_compile_and_evaluate() {
        let policy = CompiledPolicy::compile(POLICY, DEFAULT_QUERY_PATH).unwrap();
        assert!(policy.evaluate(&json!({"clientID": "c1"})).unwrap());
        assert!(!policy.evaluate(&json!({"clientID": "c2"})).unwrap());
        assert!(!policy.evaluate(&json!({})).unwrap());
    }

    #[test]
    fn test_bad_source_is_compile_error() {
        let err = CompiledPolicy::compile("package api.access\n\nallow {", DEFAULT_QUERY_PATH)
            .unwrap_err();
        assert!(matches!(err, PolicyError::Compile { .. }));
    }

    #[test]
    fn test_unresolvable_query_path_is_compile_error() {
        let err = CompiledPolicy::compile(POLICY, "data.api.access.nothing").unwrap_err();
        assert!(matches!(err, PolicyError::Compile { .. }));
    }

    #[test]
    fn test_non_boolean_query_path_is_evaluation_error() {
        let source = r#"
package api.access

allow = false

actions := ["read"]
"#;
        let policy = CompiledPolicy::compile(source, "data.api.access.actions").unwrap();
        let err = policy.evaluate(&json!({})).unwrap_err();
        assert!(matches!(err, PolicyError::Evaluation { .. }));
    }
}
