use serde::Deserialize;
use serde_json::Value;

use crate::file::ConfigFile;

/// Checks a merged configuration document against the configuration schema.
pub trait SchemaValidator {
    /// Every violation found, or an empty list if the document conforms.
    fn validate(&self, document: &Value) -> Vec<String>;
}

/// Schema derived from the typed [`ConfigFile`] definition.
///
/// A document conforms when it deserializes into `ConfigFile`: the top level
/// is an object, no unknown fields appear, and every value has the right type.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinSchema;

impl SchemaValidator for BuiltinSchema {
    fn validate(&self, document: &Value) -> Vec<String> {
        if !document.is_object() {
            return vec!["the configuration must be a JSON object".to_string()];
        }
        match ConfigFile::deserialize(document) {
            Ok(_) => Vec::new(),
            Err(e) => vec![e.to_string()],
        }
    }
}
