//! Field schemas that queries are bound against.
//!
//! A schema is supplied by the caller, either built in code or loaded from
//! JSON:
//!
//! ```json
//! {
//!   "age":     { "type": "number" },
//!   "name":    { "type": "string", "nullable": true },
//!   "status":  { "type": "enum", "variants": ["active", "banned"] },
//!   "created": { "type": "date", "format": "%Y-%m-%d" }
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ast::Operator;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    String,
    /// Integers and decimals alike
    Number,
    Boolean,
    /// Dates and date-times.
    ///
    /// `format` is a chrono format string; without one, ISO 8601 dates,
    /// date-times, and RFC 3339 timestamps are accepted.
    Date {
        #[serde(default)]
        format: Option<String>,
    },
    /// A string restricted to a fixed set of variants
    Enum { variants: Vec<String> },
}

impl FieldType {
    /// What a literal must look like for this type, for diagnostics.
    pub fn expectation(&self) -> String {
        match self {
            FieldType::String => "a string".to_string(),
            FieldType::Number => "a number".to_string(),
            FieldType::Boolean => "a boolean".to_string(),
            FieldType::Date { format: Some(format) } => {
                format!("a date string in format '{format}' or ISO 8601")
            }
            FieldType::Date { format: None } => "an ISO 8601 date string".to_string(),
            FieldType::Enum { variants } => {
                let quoted: Vec<String> = variants.iter().map(|v| format!("'{v}'")).collect();
                format!("one of {}", quoted.join(", "))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date { .. } => "date",
            FieldType::Enum { .. } => "enum",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(flatten)]
    pub ty: FieldType,
    #[serde(default)]
    pub nullable: bool,
}

impl FieldDescriptor {
    /// A non-nullable field of type `ty`.
    pub fn new(ty: FieldType) -> Self {
        FieldDescriptor {
            ty,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// Errors loading or validating a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("field name '{0}' is not a valid identifier")]
    InvalidFieldName(String),

    #[error("field name '{0}' is a reserved word")]
    ReservedFieldName(String),

    #[error("enum field '{0}' declares no variants")]
    EmptyEnum(String),
}

/// Mapping from field name to descriptor. Read-only to the binder.
///
/// # Examples
///
/// ```
/// use callq::{FieldDescriptor, FieldType, Schema};
///
/// let schema = Schema::new()
///     .with_field("age", FieldDescriptor::new(FieldType::Number))
///     .with_field("name", FieldDescriptor::new(FieldType::String).nullable());
/// assert!(schema.get("age").is_some());
/// assert!(schema.get("email").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldDescriptor>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.insert(name, descriptor);
        self
    }

    /// Add or replace a field.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: FieldDescriptor) {
        self.fields.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(name, d)| (name.as_str(), d))
    }

    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_str(json)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn from_json_value(json: serde_json::Value) -> Result<Self, SchemaError> {
        let schema: Schema = serde_json::from_value(json)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check that every field can actually be referenced from a query.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (name, descriptor) in &self.fields {
            if !IDENTIFIER.is_match(name) {
                return Err(SchemaError::InvalidFieldName(name.clone()));
            }
            if Operator::is_reserved_word(name) {
                return Err(SchemaError::ReservedFieldName(name.clone()));
            }
            if let FieldType::Enum { variants } = &descriptor.ty {
                if variants.is_empty() {
                    return Err(SchemaError::EmptyEnum(name.clone()));
                }
            }
        }
        Ok(())
    }
}
