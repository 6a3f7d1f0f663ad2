//! Data types and values stored in the catalog
//!
//! Field definitions carry a declared [`DataType`]; their default and enum
//! values are typed [`Value`]s checked against it.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataType {
    /// Any value, no type checking
    #[default]
    Any,
    /// Boolean type
    Boolean,
    /// Signed 64-bit integer
    Integer,
    /// Double-precision floating point
    Float,
    /// Arbitrary-precision decimal
    Decimal,
    /// Text
    String,
    /// Binary data
    Bytes,
    /// Timestamp, stored as text
    Datetime,
    /// Time span
    Duration,
    /// Ordered list of values
    Array,
    /// Keyed map of values
    Object,
    /// Reference to a record, stored as text
    Record,
}

impl DataType {
    /// Check if this type is numeric
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float | DataType::Decimal)
    }

    /// Check that a value may be stored in a field of this type.
    ///
    /// Floats anywhere inside the value must be finite.
    pub fn check(&self, value: &Value) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::NonFinite(value.to_string()));
        }
        if value.conforms_to(self) {
            Ok(())
        } else {
            Err(Error::TypeMismatch {
                expected: self.to_string(),
                found: value.type_name().to_string(),
            })
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Any => "any",
            DataType::Boolean => "bool",
            DataType::Integer => "int",
            DataType::Float => "float",
            DataType::Decimal => "decimal",
            DataType::String => "string",
            DataType::Bytes => "bytes",
            DataType::Datetime => "datetime",
            DataType::Duration => "duration",
            DataType::Array => "array",
            DataType::Object => "object",
            DataType::Record => "record",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(DataType::Any),
            "bool" | "boolean" => Ok(DataType::Boolean),
            "int" | "integer" => Ok(DataType::Integer),
            "float" => Ok(DataType::Float),
            "decimal" | "number" => Ok(DataType::Decimal),
            "string" => Ok(DataType::String),
            "bytes" => Ok(DataType::Bytes),
            "datetime" => Ok(DataType::Datetime),
            "duration" => Ok(DataType::Duration),
            "array" => Ok(DataType::Array),
            "object" => Ok(DataType::Object),
            "record" => Ok(DataType::Record),
            _ => Err(Error::UnknownVariant {
                kind: "data type",
                value: s.to_string(),
            }),
        }
    }
}

/// A typed value held by a field definition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Duration(Duration),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Name of the value's variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Duration(_) => "duration",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Check that every float in this value, including nested ones, is finite
    pub fn is_finite(&self) -> bool {
        match self {
            Value::Float(x) => x.is_finite(),
            Value::Array(items) => items.iter().all(Value::is_finite),
            Value::Object(map) => map.values().all(Value::is_finite),
            _ => true,
        }
    }

    /// Check if this value may be stored in a field of the given type.
    ///
    /// Null conforms to every type; nullability is enforced by the field's
    /// `not_null` flag at write time, not here.
    pub fn conforms_to(&self, data_type: &DataType) -> bool {
        match (self, data_type) {
            (Value::Null, _) | (_, DataType::Any) => true,
            (Value::Bool(_), DataType::Boolean) => true,
            (Value::Int(_), t) if t.is_numeric() => true,
            (Value::Float(_), DataType::Float | DataType::Decimal) => true,
            (Value::Str(_), DataType::String | DataType::Datetime | DataType::Record) => true,
            (Value::Bytes(_), DataType::Bytes) => true,
            (Value::Duration(_), DataType::Duration) => true,
            (Value::Array(_), DataType::Array) => true,
            (Value::Object(_), DataType::Object) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Object(map) => {
                let parts: Vec<String> = map.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

/// Stored expression text, kept verbatim and never evaluated by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expr(String);

impl Expr {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signing algorithm of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    EdDsa,
    Es256,
    Es384,
    Es512,
    Hs256,
    Hs384,
    Hs512,
    Ps256,
    Ps384,
    Ps512,
    Rs256,
    Rs384,
    Rs512,
}

impl Algorithm {
    /// Check if the key is a shared secret rather than a public key
    pub fn is_symmetric(&self) -> bool {
        matches!(self, Algorithm::Hs256 | Algorithm::Hs384 | Algorithm::Hs512)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::EdDsa => "EDDSA",
            Algorithm::Es256 => "ES256",
            Algorithm::Es384 => "ES384",
            Algorithm::Es512 => "ES512",
            Algorithm::Hs256 => "HS256",
            Algorithm::Hs384 => "HS384",
            Algorithm::Hs512 => "HS512",
            Algorithm::Ps256 => "PS256",
            Algorithm::Ps384 => "PS384",
            Algorithm::Ps512 => "PS512",
            Algorithm::Rs256 => "RS256",
            Algorithm::Rs384 => "RS384",
            Algorithm::Rs512 => "RS512",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "EDDSA" => Ok(Algorithm::EdDsa),
            "ES256" => Ok(Algorithm::Es256),
            "ES384" => Ok(Algorithm::Es384),
            "ES512" => Ok(Algorithm::Es512),
            "HS256" => Ok(Algorithm::Hs256),
            "HS384" => Ok(Algorithm::Hs384),
            "HS512" => Ok(Algorithm::Hs512),
            "PS256" => Ok(Algorithm::Ps256),
            "PS384" => Ok(Algorithm::Ps384),
            "PS512" => Ok(Algorithm::Ps512),
            "RS256" => Ok(Algorithm::Rs256),
            "RS384" => Ok(Algorithm::Rs384),
            "RS512" => Ok(Algorithm::Rs512),
            _ => Err(Error::UnknownVariant {
                kind: "token algorithm",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conformance() {
        assert!(Value::Int(5).conforms_to(&DataType::Integer));
        assert!(Value::Int(5).conforms_to(&DataType::Float));
        assert!(!Value::Float(1.5).conforms_to(&DataType::Integer));
        assert!(Value::Null.conforms_to(&DataType::Bytes));
        assert!(Value::Str("x".into()).conforms_to(&DataType::Any));
        assert!(!Value::Str("x".into()).conforms_to(&DataType::Boolean));
    }

    #[test]
    fn test_check_reports_types() {
        let err = DataType::Integer
            .check(&Value::Str("ten".into()))
            .unwrap_err();
        assert_eq!(err.to_string(), "Type error: expected int, found string");
    }

    #[test]
    fn test_non_finite_floats_rejected() {
        assert!(DataType::Float.check(&Value::Float(1.5)).is_ok());
        assert!(matches!(
            DataType::Float.check(&Value::Float(f64::NAN)),
            Err(Error::NonFinite(_))
        ));
        assert!(DataType::Any.check(&Value::Float(f64::INFINITY)).is_err());

        let nested = Value::Array(vec![Value::Int(1), Value::Float(f64::NEG_INFINITY)]);
        assert!(!nested.is_finite());
        assert!(DataType::Array.check(&nested).is_err());

        let mut map = BTreeMap::new();
        map.insert("x".to_string(), Value::Float(f64::NAN));
        assert!(DataType::Object.check(&Value::Object(map)).is_err());
    }

    #[test]
    fn test_parse_data_type() {
        assert_eq!("INT".parse::<DataType>().unwrap(), DataType::Integer);
        assert_eq!("boolean".parse::<DataType>().unwrap(), DataType::Boolean);
        assert!(matches!(
            "varchar".parse::<DataType>(),
            Err(Error::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_parse_algorithm() {
        assert_eq!("hs256".parse::<Algorithm>().unwrap(), Algorithm::Hs256);
        assert_eq!(Algorithm::EdDsa.to_string(), "EDDSA");
        assert!(Algorithm::Hs384.is_symmetric());
        assert!(!Algorithm::Rs512.is_symmetric());
        assert!("none".parse::<Algorithm>().is_err());
    }
}
