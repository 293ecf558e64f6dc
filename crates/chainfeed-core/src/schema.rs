//! Fixed JSON Schemas for streamed records.
//!
//! The documents live in `schemas/` next to this crate and are compiled into
//! the binary. Validation collects every violation rather than stopping at
//! the first one, so a failing record can be diagnosed from a single run.

use jsonschema::Validator;
use serde_json::Value;
use std::fmt;

use crate::error::SchemaError;

/// Schema for records printed by the status example.
pub const STATUS_SCHEMA: &str = "jsonstream-status";
/// Schema for records printed by the JSON-lines blocks example.
pub const BLOCKS_SCHEMA: &str = "jsonstream-blocks";

const BUILTIN: &[(&str, &str)] = &[
    (STATUS_SCHEMA, include_str!("../schemas/jsonstream-status.json")),
    (BLOCKS_SCHEMA, include_str!("../schemas/jsonstream-blocks.json")),
];

/// A compiled record schema.
pub struct RecordSchema {
    name: String,
    document: Value,
    validator: Validator,
}

impl RecordSchema {
    /// Compile a schema from a JSON document.
    pub fn from_value(name: impl Into<String>, document: Value) -> Result<Self, SchemaError> {
        let name = name.into();
        let validator = jsonschema::validator_for(&document).map_err(|e| SchemaError::Compile {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name,
            document,
            validator,
        })
    }

    /// Load one of the schemas shipped with this crate.
    pub fn builtin(name: &str) -> Result<Self, SchemaError> {
        let (_, text) = BUILTIN
            .iter()
            .find(|(n, _)| *n == name)
            .ok_or_else(|| SchemaError::NotFound {
                name: name.to_string(),
            })?;
        Self::from_value(name, serde_json::from_str(text)?)
    }

    /// Names of the schemas shipped with this crate.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(n, _)| *n)
    }

    pub fn status() -> Result<Self, SchemaError> {
        Self::builtin(STATUS_SCHEMA)
    }

    pub fn blocks() -> Result<Self, SchemaError> {
        Self::builtin(BLOCKS_SCHEMA)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn is_valid(&self, record: &Value) -> bool {
        self.validator.is_valid(record)
    }

    /// Validate a record, reporting every violation.
    pub fn validate(&self, record: &Value) -> Result<(), SchemaError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(record)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Violation {
                schema: self.name.clone(),
                errors,
            })
        }
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema").field("name", &self.name).finish()
    }
}
