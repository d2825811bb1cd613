use serde_json::Value;

use crate::{
    Error, Result,
    error::{SourceContext, Stage},
    schema::{BuiltinSchema, SchemaValidator},
};

const DEFAULTS_FILENAME: &str = "api-surface-defaults.json";
const DEFAULTS_JSON: &str = include_str!("api-surface-defaults.json");

/// Built-in defaults merged underneath every loaded configuration.
///
/// Parse once at startup and pass by reference to [`crate::ConfigLoader`].
#[derive(Debug, Clone)]
pub struct DefaultConfig {
    document: Value,
}

impl DefaultConfig {
    /// Parse and validate the embedded defaults document.
    pub fn load() -> Result<Self> {
        let ctx = SourceContext::new(DEFAULTS_JSON, DEFAULTS_FILENAME);
        let document: Value =
            serde_json::from_str(DEFAULTS_JSON).map_err(|e| ctx.parse_error(e))?;

        let violations = BuiltinSchema.validate(&document);
        if !violations.is_empty() {
            return Err(Error::schema(Stage::Loading, DEFAULTS_FILENAME, violations));
        }

        Ok(Self { document })
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}
