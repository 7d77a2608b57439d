// src/exporter/coerce.rs - fallible conversions from raw JSON values to
// column types
use crate::schema::{FieldType, FieldValue};
use serde_json::Value;

/// Coerce an optional raw value to the declared column type.
///
/// Numeric failures (missing field included) produce the -1 sentinel the
/// downstream store's existing columns expect; string and boolean failures
/// produce `Absent`.
pub fn coerce(field_type: FieldType, value: Option<&Value>) -> FieldValue {
    match field_type {
        FieldType::Integer => match value.and_then(to_integer) {
            Some(i) => FieldValue::Integer(i),
            None => FieldValue::Integer(-1),
        },
        FieldType::Float => match value.and_then(to_float) {
            Some(f) => FieldValue::Float(f),
            None => FieldValue::Float(-1.0),
        },
        FieldType::String => match value.and_then(to_string) {
            Some(s) => FieldValue::Str(s),
            None => FieldValue::Absent,
        },
        FieldType::Boolean => match value.and_then(to_boolean) {
            Some(b) => FieldValue::Boolean(b),
            None => FieldValue::Absent,
        },
    }
}

/// JSON numbers (floats truncate) and numeric strings convert; anything else
/// fails
pub fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// JSON numbers and numeric strings convert; anything else fails
pub fn to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Only JSON strings convert; numbers and booleans requested as string fail
pub fn to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// JSON booleans and the strings "true"/"false" (any case) convert
pub fn to_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}
