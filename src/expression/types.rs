//! Declared variable types and runtime values.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The declared type of a variable, literal or expression result.
///
/// Serialized in lowercase (`"integer"`, `"array"`, ...), the same spelling
/// the diagram editor stores.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VariableType {
    /// Signed 64-bit integer.
    Integer,
    /// UTF-8 text.
    String,
    /// 64-bit IEEE float.
    Float,
    /// `true` / `false`.
    Boolean,
    /// Fixed-size homogeneous array of a scalar subtype.
    Array,
}

impl VariableType {
    /// Returns `true` for [`VariableType::Integer`] and [`VariableType::Float`].
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, VariableType::Integer | VariableType::Float)
    }

    /// Returns `true` for every type except [`VariableType::Array`].
    #[must_use]
    pub const fn is_scalar(self) -> bool {
        !matches!(self, VariableType::Array)
    }
}

/// A runtime value.
///
/// Serialized untagged, so integers, floats, strings and booleans appear as
/// their JSON counterparts and arrays as JSON arrays. Integral JSON numbers
/// deserialize as [`Value::Integer`], fractional ones as [`Value::Float`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value.
    Integer(i64),
    /// Float value.
    Float(f64),
    /// Boolean value.
    Boolean(bool),
    /// String value.
    String(String),
    /// Array value; all elements share the array's subtype.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the zero value of a scalar type: `0`, `0.0`, `""` or `false`.
    ///
    /// Arrays have no zero value of their own; use [`Value::zeroed_array`].
    #[must_use]
    pub fn zero(ty: VariableType) -> Option<Value> {
        match ty {
            VariableType::Integer => Some(Value::Integer(0)),
            VariableType::Float => Some(Value::Float(0.0)),
            VariableType::String => Some(Value::String(String::new())),
            VariableType::Boolean => Some(Value::Boolean(false)),
            VariableType::Array => None,
        }
    }

    /// Returns an array of `size` zero values of `subtype`.
    #[must_use]
    pub fn zeroed_array(subtype: VariableType, size: usize) -> Option<Value> {
        let zero = Value::zero(subtype)?;
        Some(Value::Array(vec![zero; size]))
    }

    /// Returns the type this value naturally has.
    #[must_use]
    pub const fn value_type(&self) -> VariableType {
        match self {
            Value::Integer(_) => VariableType::Integer,
            Value::Float(_) => VariableType::Float,
            Value::Boolean(_) => VariableType::Boolean,
            Value::String(_) => VariableType::String,
            Value::Array(_) => VariableType::Array,
        }
    }

    /// Returns the boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer payload, if this is an integer.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the array elements, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// An evaluation result: a value together with the type it was computed as.
///
/// `element_type` is set when `ty` is [`VariableType::Array`] and the
/// array's subtype is known.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedValue {
    /// The computed value.
    pub value: Value,
    /// The type the value was computed as.
    pub ty: VariableType,
    /// Element type for arrays.
    pub element_type: Option<VariableType>,
}

impl TypedValue {
    /// Wraps a scalar value with its natural type.
    #[must_use]
    pub fn scalar(value: Value) -> Self {
        let ty = value.value_type();
        TypedValue {
            value,
            ty,
            element_type: None,
        }
    }

    /// Wraps an array value with its element type.
    #[must_use]
    pub fn array(items: Vec<Value>, element_type: Option<VariableType>) -> Self {
        TypedValue {
            value: Value::Array(items),
            ty: VariableType::Array,
            element_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_variable_type_names() {
        assert_eq!(VariableType::Integer.to_string(), "integer");
        assert_eq!(VariableType::from_str("boolean").unwrap(), VariableType::Boolean);
        assert_eq!(
            serde_json::to_string(&VariableType::Array).unwrap(),
            "\"array\""
        );
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero(VariableType::Integer), Some(Value::Integer(0)));
        assert_eq!(Value::zero(VariableType::String), Some(Value::String(String::new())));
        assert_eq!(Value::zero(VariableType::Array), None);
        assert_eq!(
            Value::zeroed_array(VariableType::Boolean, 2),
            Some(Value::Array(vec![Value::Boolean(false), Value::Boolean(false)]))
        );
    }

    #[test]
    fn test_value_json_shape() {
        let value = Value::Array(vec![Value::Integer(1), Value::Float(2.5)]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[1,2.5]");

        let back: Value = serde_json::from_str("[1,2.5,true,\"x\"]").unwrap();
        assert_eq!(
            back,
            Value::Array(vec![
                Value::Integer(1),
                Value::Float(2.5),
                Value::Boolean(true),
                Value::String("x".into()),
            ])
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(
            Value::Array(vec![Value::Integer(0), Value::Integer(5)]).to_string(),
            "[0, 5]"
        );
        assert_eq!(Value::String("hi".into()).to_string(), "hi");
    }
}
