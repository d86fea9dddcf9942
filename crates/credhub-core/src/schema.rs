//! Registry of JSON schemas that credential claims are validated against.
//!
//! Only the subset of JSON Schema used by flat claim documents is checked: `required`,
//! per-property `type` and `additionalProperties: false`.
use crate::claims::ClaimMap;
use crate::service::CredentialServiceError;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// An error loading schemas into the registry.
#[derive(Error, Debug)]
pub enum SchemaRegistryError {
    #[error("Failed to read schema file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse schema file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Schema must be a JSON object: {0}")]
    NotAnObject(String),
}

/// Schemas keyed by schema ID.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Value>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON file mapping schema IDs to schema documents.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaRegistryError> {
        let schemas: HashMap<String, Value> =
            serde_json::from_slice(&std::fs::read(path.as_ref())?)?;
        let mut registry = Self::new();
        for (id, schema) in schemas {
            registry.insert(&id, schema)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, id: &str, schema: Value) -> Result<(), SchemaRegistryError> {
        if !schema.is_object() {
            return Err(SchemaRegistryError::NotAnObject(id.to_string()));
        }
        self.schemas.insert(id.to_string(), schema);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.schemas.get(id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Validates claims against the schema registered under `schema_id`.
    pub fn validate(
        &self,
        schema_id: &str,
        claims: &ClaimMap,
    ) -> Result<(), CredentialServiceError> {
        let schema = self
            .get(schema_id)
            .ok_or_else(|| CredentialServiceError::SchemaNotFound(schema_id.to_string()))?;

        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for name in required.iter().filter_map(Value::as_str) {
                if !claims.contains_key(name) {
                    return Err(CredentialServiceError::SchemaValidation(format!(
                        "missing required claim \"{name}\""
                    )));
                }
            }
        }

        let properties = schema.get("properties").and_then(Value::as_object);
        let closed = matches!(schema.get("additionalProperties"), Some(Value::Bool(false)));
        for (name, value) in claims {
            let property = properties.and_then(|p| p.get(name));
            match property {
                None if closed => {
                    return Err(CredentialServiceError::SchemaValidation(format!(
                        "claim \"{name}\" is not allowed"
                    )));
                }
                None => continue,
                Some(property) => {
                    if !type_allowed(property.get("type"), value.json_type()) {
                        return Err(CredentialServiceError::SchemaValidation(format!(
                            "claim \"{name}\" has type {}",
                            value.json_type()
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Whether `actual` satisfies a `type` keyword. An `integer` is also a `number`.
fn type_allowed(expected: Option<&Value>, actual: &str) -> bool {
    let accepts = |t: &str| t == actual || (t == "number" && actual == "integer");
    match expected {
        None => true,
        Some(Value::String(t)) => accepts(t.as_str()),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(accepts),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const DEGREE_SCHEMA_ID: &str = "https://example.com/schemas/degree.json";

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .insert(
                DEGREE_SCHEMA_ID,
                json!({
                    "$schema": "http://json-schema.org/draft-07/schema#",
                    "type": "object",
                    "properties": {
                        "givenName": { "type": "string" },
                        "graduationYear": { "type": "integer" },
                        "gpa": { "type": "number" },
                        "honours": { "type": ["boolean", "null"] }
                    },
                    "required": ["givenName"],
                    "additionalProperties": false
                }),
            )
            .unwrap();
        registry
    }

    fn claims(value: Value) -> ClaimMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_validate_ok() {
        let claims = claims(json!({
            "givenName": "Jane",
            "graduationYear": 2010,
            "gpa": 4,
            "honours": null
        }));
        assert!(registry().validate(DEGREE_SCHEMA_ID, &claims).is_ok());
    }

    #[test]
    fn test_validate_unknown_schema() {
        let result = registry().validate("unknown", &claims(json!({"givenName": "Jane"})));
        assert!(matches!(
            result,
            Err(CredentialServiceError::SchemaNotFound(id)) if id == "unknown"
        ));
    }

    #[test]
    fn test_validate_missing_required() {
        let result = registry().validate(DEGREE_SCHEMA_ID, &claims(json!({"gpa": 3.5})));
        assert!(matches!(result, Err(CredentialServiceError::SchemaValidation(_))));
    }

    #[test]
    fn test_validate_wrong_type() {
        let result = registry().validate(
            DEGREE_SCHEMA_ID,
            &claims(json!({"givenName": "Jane", "graduationYear": "2010"})),
        );
        assert!(matches!(result, Err(CredentialServiceError::SchemaValidation(_))));
    }

    #[test]
    fn test_validate_additional_property() {
        let result = registry().validate(
            DEGREE_SCHEMA_ID,
            &claims(json!({"givenName": "Jane", "familyName": "Bloggs"})),
        );
        assert!(matches!(result, Err(CredentialServiceError::SchemaValidation(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "{DEGREE_SCHEMA_ID}": {{ "type": "object", "required": ["givenName"] }} }}"#
        )
        .unwrap();
        let registry = SchemaRegistry::from_file(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(DEGREE_SCHEMA_ID).is_some());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "bad": [] }}"#).unwrap();
        assert!(matches!(
            SchemaRegistry::from_file(file.path()),
            Err(SchemaRegistryError::NotAnObject(_))
        ));
    }
}
