//! # Validation Results
//!
//! The discriminated outcome of a single validate call and the normalized
//! per-field violation record.
//!
//! ## Wire shape
//!
//! ```text
//! { "ok": true,  "schemaKey": "...", "value": <input> }
//! { "ok": false, "schemaKey": "...", "errors": [{ "instancePath", "schemaPath", "message"?, "params"? }] }
//! ```

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::registry::SchemaKey;

/// One structural defect found in an input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// JSON Pointer to the offending value in the instance; empty for the root.
    pub instance_path: String,
    /// JSON Pointer to the offending keyword in the schema.
    pub schema_path: String,
    /// Human-readable description, when the engine provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Engine-specific parameters (e.g. which property was unexpected).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl Violation {
    /// The instance path, or `<root>` when the violation is at the document root.
    pub fn display_path(&self) -> &str {
        if self.instance_path.is_empty() {
            "<root>"
        } else {
            &self.instance_path
        }
    }

    /// Look up one engine parameter by name.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref().and_then(|p| p.get(name))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{} {}", self.display_path(), message),
            None => f.write_str(self.display_path()),
        }
    }
}

/// Outcome of validating one document against one schema key.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    /// The document conforms. `value` is the input, unmodified.
    Valid {
        /// Key the document was validated against.
        schema_key: SchemaKey,
        /// The validated input.
        value: Value,
    },
    /// The document does not conform.
    Invalid {
        /// Key the document was validated against.
        schema_key: SchemaKey,
        /// Every violation, in engine discovery order.
        errors: Vec<Violation>,
    },
}

impl ValidationResult {
    /// True for the [`ValidationResult::Valid`] variant.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// The key this result was produced for.
    pub fn schema_key(&self) -> SchemaKey {
        match self {
            Self::Valid { schema_key, .. } | Self::Invalid { schema_key, .. } => *schema_key,
        }
    }

    /// Violations of an invalid result; empty for a valid one.
    pub fn errors(&self) -> &[Violation] {
        match self {
            Self::Valid { .. } => &[],
            Self::Invalid { errors, .. } => errors,
        }
    }

    /// Convert into a `Result`, turning the invalid variant into an [`InvalidDocument`].
    pub fn into_result(self) -> Result<Value, InvalidDocument> {
        match self {
            Self::Valid { value, .. } => Ok(value),
            Self::Invalid { schema_key, errors } => Err(InvalidDocument {
                schema_key,
                violations: errors,
            }),
        }
    }
}

impl Serialize for ValidationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationResult", 3)?;
        match self {
            Self::Valid { schema_key, value } => {
                state.serialize_field("ok", &true)?;
                state.serialize_field("schemaKey", schema_key)?;
                state.serialize_field("value", value)?;
            }
            Self::Invalid { schema_key, errors } => {
                state.serialize_field("ok", &false)?;
                state.serialize_field("schemaKey", schema_key)?;
                state.serialize_field("errors", errors)?;
            }
        }
        state.end()
    }
}

/// Aggregated failure raised by `assert_valid`.
///
/// The message is derived entirely from the violation list:
/// `"<key> validation failed:"` followed by one `"<path> <message>"` line per
/// violation, in the order `validate` returned them.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{schema_key} validation failed:\n{}", render_lines(.violations))]
pub struct InvalidDocument {
    /// Key the document was validated against.
    pub schema_key: SchemaKey,
    /// Every violation, in engine discovery order.
    pub violations: Vec<Violation>,
}

fn render_lines(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn missing_name() -> Violation {
        Violation {
            instance_path: String::new(),
            schema_path: "/required".to_string(),
            message: Some(r#""name" is a required property"#.to_string()),
            params: json!({"missingProperty": "name"}).as_object().cloned(),
        }
    }

    #[test]
    fn test_violation_display_root() {
        assert_eq!(
            missing_name().to_string(),
            r#"<root> "name" is a required property"#
        );
    }

    #[test]
    fn test_violation_display_without_message() {
        let v = Violation {
            instance_path: "/wasteCode".to_string(),
            schema_path: "/properties/wasteCode/pattern".to_string(),
            message: None,
            params: None,
        };
        assert_eq!(v.to_string(), "/wasteCode");
    }

    #[test]
    fn test_violation_serialization_omits_absent_fields() {
        let v = Violation {
            instance_path: "/a".to_string(),
            schema_path: "/b".to_string(),
            message: None,
            params: None,
        };
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json, json!({"instancePath": "/a", "schemaPath": "/b"}));
    }

    #[test]
    fn test_result_wire_shape() {
        let ok = ValidationResult::Valid {
            schema_key: SchemaKey::DigitalProductPassport,
            value: json!({"id": "p-1"}),
        };
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"ok": true, "schemaKey": "digital-product-passport", "value": {"id": "p-1"}})
        );

        let bad = ValidationResult::Invalid {
            schema_key: SchemaKey::DigitalProductPassport,
            errors: vec![missing_name()],
        };
        let json = serde_json::to_value(&bad).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["errors"][0]["params"]["missingProperty"], "name");
    }

    #[test]
    fn test_invalid_document_message_lists_every_path() {
        let err = InvalidDocument {
            schema_key: SchemaKey::RecyclerOrganisation,
            violations: vec![
                missing_name(),
                Violation {
                    instance_path: "/address/postalCode".to_string(),
                    schema_path: "/properties/address/properties/postalCode/type".to_string(),
                    message: Some(r#"42 is not of type "string""#.to_string()),
                    params: None,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "recycler-organisation validation failed:\n\
             <root> \"name\" is a required property\n\
             /address/postalCode 42 is not of type \"string\""
        );
    }

    #[test]
    fn test_into_result() {
        let ok = ValidationResult::Valid {
            schema_key: SchemaKey::DigitalWastePassport,
            value: json!(1),
        };
        assert_eq!(ok.into_result().unwrap(), json!(1));
    }
}
