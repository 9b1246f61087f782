//! The platform configuration type grafted into the values schema.
//!
//! Doc comments on these types become the `description` keywords of the
//! reflected schema, so they are written for chart users.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// PlatformConfig holds platform configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformConfig {
    /// APIKey defines where to find the platform access key and host. The
    /// key is looked up in the `LICENSE` environment variable first, then in
    /// the secret named under `external.platform.apiKey.secretName`.
    pub api_key: PlatformApiKey,

    /// Project specifies which platform project the instance is imported to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// PlatformAPIKey references the secret holding the platform access key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
#[schemars(rename = "PlatformAPIKey")]
pub struct PlatformApiKey {
    /// SecretName is the name of the secret holding the access key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,

    /// Namespace of the secret. Defaults to the instance namespace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// CreateRBAC grants read access to the secret when it lives in
    /// another namespace.
    #[serde(rename = "createRBAC", skip_serializing_if = "Option::is_none")]
    pub create_rbac: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_config_uses_camel_case_keys() {
        let config = PlatformConfig {
            api_key: PlatformApiKey {
                secret_name: Some("platform-key".to_string()),
                create_rbac: Some(true),
                ..PlatformApiKey::default()
            },
            project: Some("default".to_string()),
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["apiKey"]["secretName"], "platform-key");
        assert_eq!(value["apiKey"]["createRBAC"], true);
        assert_eq!(value["project"], "default");
        assert!(value["apiKey"].get("namespace").is_none());
    }

    #[test]
    fn test_platform_config_accepts_empty_object() {
        let config: PlatformConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlatformConfig::default());
    }
}
