// src/schema.rs
use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::Deserialize;

/// Column types understood by the downstream analytics store.
///
/// `as_str()` values are the wire contract with the store's schema
/// definition step - do not rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    Float,
    String,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single typed field value, as handed to the row builder
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Str(String),
    Boolean(bool),
    /// Field unknown, data missing, or coercion failed (string/boolean policy)
    Absent,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// JSON rendering used by the jsonl output format (`Absent` becomes null)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Integer(i) => serde_json::Value::from(*i),
            FieldValue::Float(f) => {
                serde_json::Number::from_f64(*f).map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
            FieldValue::Str(s) => serde_json::Value::String(s.clone()),
            FieldValue::Boolean(b) => serde_json::Value::Bool(*b),
            FieldValue::Absent => serde_json::Value::Null,
        }
    }

    /// Cell rendering used by the csv/tsv output formats (`Absent` becomes
    /// an empty cell)
    pub fn to_cell(&self) -> String {
        match self {
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Str(s) => s.clone(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Absent => String::new(),
        }
    }
}

/// Ordered (name, type) pairs describing the columns an exporter produces.
///
/// Field names are unique; positional accessors are index-consistent with
/// each other and stable for the lifetime of the schema.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: IndexMap<String, FieldType>,
}

impl Schema {
    pub fn new(fields: Vec<(String, FieldType)>) -> Result<Self, ConfigError> {
        let mut map = IndexMap::with_capacity(fields.len());
        for (name, field_type) in fields {
            if map.insert(name.clone(), field_type).is_some() {
                return Err(ConfigError::InvalidSchema(format!(
                    "duplicate field name '{}'",
                    name
                )));
            }
        }
        Ok(Schema { fields: map })
    }

    pub fn empty() -> Self {
        Schema {
            fields: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Name of the i'th field. Panics if `i` is out of range.
    pub fn name(&self, i: usize) -> &str {
        self.fields.get_index(i).expect("field index out of range").0
    }

    /// Type of the i'th field. Panics if `i` is out of range.
    pub fn field_type(&self, i: usize) -> FieldType {
        *self.fields.get_index(i).expect("field index out of range").1
    }

    /// Exact-match lookup by field name
    pub fn lookup(&self, name: &str) -> Option<FieldType> {
        self.fields.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Append another schema's fields after this one's, rejecting duplicates
    pub fn merge(&mut self, other: &Schema) -> Result<(), ConfigError> {
        for (name, field_type) in other.iter() {
            if self.fields.insert(name.to_string(), field_type).is_some() {
                return Err(ConfigError::InvalidSchema(format!(
                    "field name '{}' produced by more than one exporter",
                    name
                )));
            }
        }
        Ok(())
    }
}
