//! Tagged field values and type-preserving coercion.
//!
//! Free-form record fields hold a [`FieldValue`]. When a field that already
//! exists is overwritten, the incoming value is converted to the tag of the
//! existing one with [`FieldValue::coerce_to`].

use std::fmt;

use serde_json::{Number, Value};

use crate::error::TypeError;
use crate::temporal::Timestamp;

/// The tag of a [`FieldValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    Timestamp,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Str => "string",
            Self::Int => "integer",
            Self::Float => "float",
            Self::Bool => "boolean",
            Self::Timestamp => "timestamp",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// A single free-form field value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(Timestamp),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// The tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Str(_) => ValueKind::Str,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::List(_) => ValueKind::List,
        }
    }

    /// False for a non-finite float, including one nested in a list. Such a
    /// value has no JSON representation.
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            Self::List(items) => items.iter().all(Self::is_finite),
            _ => true,
        }
    }

    /// Convert this value to the `target` tag.
    ///
    /// Strings are parsed (`"42"` becomes `Int(42)`, `"true"` becomes
    /// `Bool(true)`, a JSON array literal becomes a `List`). Floats convert
    /// to integers by truncation toward zero. Any value converts to `Str`
    /// through its display form. Non-finite floats are never produced.
    pub fn coerce_to(&self, target: ValueKind) -> Result<FieldValue, TypeError> {
        if self.kind() == target {
            return Ok(self.clone());
        }
        let fail = || TypeError::Coercion {
            value: self.to_string(),
            target,
        };

        match (target, self) {
            (ValueKind::Str, v) => Ok(Self::Str(v.to_string())),

            (ValueKind::Int, Self::Str(s)) => {
                s.trim().parse::<i64>().map(Self::Int).map_err(|_| fail())
            }
            (ValueKind::Int, Self::Float(f)) if f.is_finite() => Ok(Self::Int(f.trunc() as i64)),
            (ValueKind::Int, Self::Bool(b)) => Ok(Self::Int(i64::from(*b))),

            (ValueKind::Float, Self::Str(s)) => match s.trim().parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Self::Float(f)),
                _ => Err(fail()),
            },
            (ValueKind::Float, Self::Int(i)) => Ok(Self::Float(*i as f64)),
            (ValueKind::Float, Self::Bool(b)) => Ok(Self::Float(if *b { 1.0 } else { 0.0 })),

            (ValueKind::Bool, Self::Str(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(Self::Bool(true)),
                "false" | "0" => Ok(Self::Bool(false)),
                _ => Err(fail()),
            },
            (ValueKind::Bool, Self::Int(i)) => Ok(Self::Bool(*i != 0)),
            (ValueKind::Bool, Self::Float(f)) => Ok(Self::Bool(*f != 0.0)),

            (ValueKind::Timestamp, Self::Str(s)) => {
                Timestamp::parse(s.trim()).map(Self::Timestamp).map_err(|_| fail())
            }

            (ValueKind::List, Self::Str(s)) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Option<Vec<_>>>()
                    .map(Self::List)
                    .ok_or_else(fail),
                _ => Err(fail()),
            },

            _ => Err(fail()),
        }
    }

    /// Render as a plain JSON value. Timestamps become formatted strings.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Str(s) => Value::String(s.clone()),
            Self::Int(i) => Value::Number((*i).into()),
            Self::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Self::Bool(b) => Value::Bool(*b),
            Self::Timestamp(ts) => Value::String(ts.format()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
        }
    }

    /// Build from a plain JSON value.
    ///
    /// Returns `None` for `null` and nested objects, which have no field
    /// representation. Strings are never reinterpreted as timestamps.
    pub fn from_json(value: &Value) -> Option<FieldValue> {
        match value {
            Value::String(s) => Some(Self::Str(s.clone())),
            Value::Bool(b) => Some(Self::Bool(*b)),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float)),
            Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            Value::Null | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Timestamp(ts) => write!(f, "{ts}"),
            Self::List(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Timestamp> for FieldValue {
    fn from(ts: Timestamp) -> Self {
        Self::Timestamp(ts)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(items: Vec<FieldValue>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn numeric_string_coerces_to_int() {
        let v = FieldValue::from("42").coerce_to(ValueKind::Int).unwrap();
        assert_eq!(v, FieldValue::Int(42));
    }

    #[test]
    fn non_numeric_string_fails_int_coercion() {
        let err = FieldValue::from("forty-two")
            .coerce_to(ValueKind::Int)
            .unwrap_err();
        assert_eq!(
            err,
            TypeError::Coercion {
                value: "forty-two".into(),
                target: ValueKind::Int,
            }
        );
    }

    #[test]
    fn float_truncates_to_int() {
        assert_eq!(
            FieldValue::Float(-3.9).coerce_to(ValueKind::Int).unwrap(),
            FieldValue::Int(-3)
        );
    }

    #[test]
    fn string_coerces_to_float() {
        assert_eq!(
            FieldValue::from("37.77").coerce_to(ValueKind::Float).unwrap(),
            FieldValue::Float(37.77)
        );
        assert!(FieldValue::from("NaN").coerce_to(ValueKind::Float).is_err());
    }

    #[test]
    fn bool_coercion_is_explicit() {
        assert_eq!(
            FieldValue::from("TRUE").coerce_to(ValueKind::Bool).unwrap(),
            FieldValue::Bool(true)
        );
        assert_eq!(
            FieldValue::from("0").coerce_to(ValueKind::Bool).unwrap(),
            FieldValue::Bool(false)
        );
        assert!(FieldValue::from("maybe").coerce_to(ValueKind::Bool).is_err());
    }

    #[test]
    fn anything_coerces_to_string() {
        assert_eq!(
            FieldValue::Int(7).coerce_to(ValueKind::Str).unwrap(),
            FieldValue::from("7")
        );
        assert_eq!(
            FieldValue::Float(2.0).coerce_to(ValueKind::Str).unwrap(),
            FieldValue::from("2.0")
        );
    }

    #[test]
    fn string_coerces_to_timestamp() {
        let v = FieldValue::from("2017-09-28T21:05:54.119427")
            .coerce_to(ValueKind::Timestamp)
            .unwrap();
        assert_eq!(v.kind(), ValueKind::Timestamp);
        assert_eq!(v.to_string(), "2017-09-28T21:05:54.119427");
    }

    #[test]
    fn json_array_string_coerces_to_list() {
        let v = FieldValue::from(r#"["a", 1]"#)
            .coerce_to(ValueKind::List)
            .unwrap();
        assert_eq!(
            v,
            FieldValue::List(vec![FieldValue::from("a"), FieldValue::Int(1)])
        );
        assert!(FieldValue::from("abc").coerce_to(ValueKind::List).is_err());
    }

    #[test]
    fn same_kind_is_identity() {
        let v = FieldValue::from("unchanged");
        assert_eq!(v.coerce_to(ValueKind::Str).unwrap(), v);
    }

    #[test]
    fn json_numbers_keep_their_tag() {
        assert_eq!(FieldValue::from_json(&json!(3)), Some(FieldValue::Int(3)));
        assert_eq!(
            FieldValue::from_json(&json!(3.0)),
            Some(FieldValue::Float(3.0))
        );
        assert_eq!(FieldValue::Float(0.0).to_json().to_string(), "0.0");
    }

    #[test]
    fn json_null_and_objects_are_rejected() {
        assert_eq!(FieldValue::from_json(&json!(null)), None);
        assert_eq!(FieldValue::from_json(&json!({"a": 1})), None);
        assert_eq!(FieldValue::from_json(&json!([1, null])), None);
    }

    #[test]
    fn timestamp_renders_as_text() {
        let ts = Timestamp::parse("2020-01-01T00:00:00.000001").unwrap();
        assert_eq!(
            FieldValue::Timestamp(ts).to_json(),
            json!("2020-01-01T00:00:00.000001")
        );
    }

    #[test]
    fn non_finite_floats_are_flagged() {
        assert!(FieldValue::Float(1.5).is_finite());
        assert!(!FieldValue::Float(f64::NAN).is_finite());
        assert!(!FieldValue::List(vec![FieldValue::Int(1), FieldValue::Float(f64::INFINITY)]).is_finite());
        assert!(FieldValue::from("NaN").is_finite());
    }

    proptest! {
        #[test]
        fn rendered_integers_coerce_back(n in any::<i64>()) {
            let v = FieldValue::from(n.to_string()).coerce_to(ValueKind::Int).unwrap();
            prop_assert_eq!(v, FieldValue::Int(n));
        }
    }
}
