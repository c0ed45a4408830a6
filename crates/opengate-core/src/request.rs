//! The access-decision request shape.

use serde::{Deserialize, Serialize};

/// A single access-control question: may this client perform this action
/// with these attributes against this API?
///
/// The field names mirror the JSON wire format consumed by the decision
/// endpoint and, unchanged, the `input` document handed to the policy
/// engine. Requests are transient and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub application_name: String,
    pub environment: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    pub api_name: String,
    pub api_version: String,
    pub action: String,
    /// Requested attributes; an absent list is an empty set.
    #[serde(default)]
    pub attributes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        let json = r#"{
            "applicationName": "billing",
            "environment": "prod",
            "clientID": "c1",
            "apiName": "invoices",
            "apiVersion": "v1",
            "action": "read",
            "attributes": ["amount"]
        }"#;
        let req: AccessRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.application_name, "billing");
        assert_eq!(req.client_id, "c1");
        assert_eq!(req.attributes, vec!["amount"]);

        let out = serde_json::to_value(&req).unwrap();
        assert!(out.get("clientID").is_some());
        assert!(out.get("apiVersion").is_some());
    }

    #[test]
    fn test_attributes_default_to_empty() {
        let json = r#"{
            "applicationName": "billing",
            "environment": "prod",
            "clientID": "c1",
            "apiName": "invoices",
            "apiVersion": "v1",
            "action": "read"
        }"#;
        let req: AccessRequest = serde_json::from_str(json).unwrap();
        assert!(req.attributes.is_empty());
    }
}
