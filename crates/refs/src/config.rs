use serde::{Deserialize, Serialize};

/// The identifiers a [`DataReferenceResolver`](crate::DataReferenceResolver) treats specially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// The requester's authentication context.
    pub auth_identifier: String,
    /// The root of the stored data.
    pub root_identifier: String,
    /// The stored data at the rule's own location.
    pub data_identifier: String,
    /// The payload of the write being checked.
    pub new_data_identifier: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            auth_identifier: "auth".to_string(),
            root_identifier: "root".to_string(),
            data_identifier: "data".to_string(),
            new_data_identifier: "newData".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{ "authIdentifier": "user" }"#).unwrap();
        assert_eq!(config.auth_identifier, "user");
        assert_eq!(config.new_data_identifier, "newData");
    }
}
