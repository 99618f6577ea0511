//
//  cf-client
//  jsonry/field.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Field conversions.
//!
//! [`JsonryField`] is implemented for every type that may appear as a field
//! of a jsonry struct. Nested jsonry structs get their implementation from
//! the [`jsonry!`](crate::jsonry!) macro.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Number, Value};

use super::error::{json_type_name, JsonryError};

/// Where a conversion is happening, for error messages.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub field: &'a str,
    pub index: Option<usize>,
}

impl<'a> Context<'a> {
    pub fn field(field: &'a str) -> Self {
        Self { field, index: None }
    }

    pub fn at(self, index: usize) -> Self {
        Self {
            index: Some(index),
            ..self
        }
    }

    /// Builds the mismatch error for `value` against `target`.
    pub fn mismatch(&self, value: &Value, target: &'static str) -> JsonryError {
        JsonryError::TypeMismatch {
            field: self.field.to_string(),
            value: value.to_string(),
            json_type: json_type_name(value),
            target,
            index: self.index,
        }
    }
}

/// Conversion between a field value and a JSON value.
pub trait JsonryField: Sized {
    /// Renders the value. Sequences render as arrays so list paths can
    /// distribute them.
    fn to_json(&self) -> Value;

    /// Converts a value found at the field's path.
    fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError>;

    /// Whether `omitempty` should drop this value.
    fn is_zero(&self) -> bool;
}

impl JsonryField for String {
    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            other => Err(ctx.mismatch(other, "String")),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl JsonryField for bool {
    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Null => Ok(false),
            other => Err(ctx.mismatch(other, "bool")),
        }
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

macro_rules! signed_field {
    ($($ty:ty),*) => {$(
        impl JsonryField for $ty {
            fn to_json(&self) -> Value {
                Value::Number(Number::from(*self))
            }

            fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
                match value {
                    Value::Null => Ok(0),
                    Value::Number(n) => n
                        .as_i64()
                        .and_then(|i| <$ty>::try_from(i).ok())
                        .ok_or_else(|| ctx.mismatch(value, stringify!($ty))),
                    other => Err(ctx.mismatch(other, stringify!($ty))),
                }
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

macro_rules! unsigned_field {
    ($($ty:ty),*) => {$(
        impl JsonryField for $ty {
            fn to_json(&self) -> Value {
                Value::Number(Number::from(*self))
            }

            fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
                match value {
                    Value::Null => Ok(0),
                    Value::Number(n) => n
                        .as_u64()
                        .and_then(|u| <$ty>::try_from(u).ok())
                        .ok_or_else(|| ctx.mismatch(value, stringify!($ty))),
                    other => Err(ctx.mismatch(other, stringify!($ty))),
                }
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }
        }
    )*};
}

signed_field!(i8, i16, i32, i64, isize);
unsigned_field!(u8, u16, u32, u64, usize);

macro_rules! float_field {
    ($($ty:ty),*) => {$(
        impl JsonryField for $ty {
            fn to_json(&self) -> Value {
                Number::from_f64(f64::from(*self))
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            }

            fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
                match value {
                    Value::Null => Ok(0.0),
                    Value::Number(n) => n
                        .as_f64()
                        .map(|f| f as $ty)
                        .ok_or_else(|| ctx.mismatch(value, stringify!($ty))),
                    other => Err(ctx.mismatch(other, stringify!($ty))),
                }
            }

            fn is_zero(&self) -> bool {
                *self == 0.0
            }
        }
    )*};
}

float_field!(f32, f64);

impl JsonryField for Value {
    fn to_json(&self) -> Value {
        self.clone()
    }

    fn from_json(value: &Value, _ctx: Context<'_>) -> Result<Self, JsonryError> {
        Ok(value.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

impl<T: JsonryField> JsonryField for Option<T> {
    fn to_json(&self) -> Value {
        match self {
            Some(inner) => inner.to_json(),
            None => Value::Null,
        }
    }

    fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_json(other, ctx).map(Some),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

impl<T: JsonryField> JsonryField for Vec<T> {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(JsonryField::to_json).collect())
    }

    fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| T::from_json(item, ctx.at(i)))
                .collect(),
            other => Err(ctx.mismatch(other, "list")),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

/// A string that distinguishes "unset" (JSON `null`) from `""`.
///
/// # Example
///
/// ```rust
/// use cf_client::jsonry::NullString;
///
/// let unset = NullString::default();
/// let empty = NullString::from("");
///
/// assert!(!unset.is_set);
/// assert!(empty.is_set);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NullString {
    pub value: String,
    pub is_set: bool,
}

impl NullString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_set: true,
        }
    }
}

impl From<&str> for NullString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl JsonryField for NullString {
    fn to_json(&self) -> Value {
        if self.is_set {
            Value::String(self.value.clone())
        } else {
            Value::Null
        }
    }

    fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::String(s) => Ok(Self::new(s.clone())),
            other => Err(ctx.mismatch(other, "NullString")),
        }
    }

    fn is_zero(&self) -> bool {
        !self.is_set
    }
}

/// String-keyed map of nullable strings, as used by labels and annotations.
pub type NullStringMap = BTreeMap<String, NullString>;

impl<T: JsonryField> JsonryField for BTreeMap<String, T> {
    fn to_json(&self) -> Value {
        Value::Object(
            self.iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect::<Map<String, Value>>(),
        )
    }

    fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(entries) => entries
                .iter()
                .map(|(k, v)| T::from_json(v, ctx).map(|v| (k.clone(), v)))
                .collect(),
            other => Err(ctx.mismatch(other, "map")),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: JsonryField> JsonryField for HashMap<String, T> {
    fn to_json(&self) -> Value {
        // Sorted so output is stable.
        let sorted: BTreeMap<&String, &T> = self.iter().collect();
        Value::Object(
            sorted
                .into_iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect::<Map<String, Value>>(),
        )
    }

    fn from_json(value: &Value, ctx: Context<'_>) -> Result<Self, JsonryError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(entries) => entries
                .iter()
                .map(|(k, v)| T::from_json(v, ctx).map(|v| (k.clone(), v)))
                .collect(),
            other => Err(ctx.mismatch(other, "map")),
        }
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> Context<'static> {
        Context::field("count")
    }

    #[test]
    fn test_integer_range_is_checked() {
        assert_eq!(u8::from_json(&json!(255), ctx()).unwrap(), 255);
        let err = u8::from_json(&json!(256), ctx()).unwrap_err();
        assert!(matches!(err, JsonryError::TypeMismatch { target: "u8", .. }));
        assert!(u32::from_json(&json!(-1), ctx()).is_err());
        assert!(i64::from_json(&json!(1.5), ctx()).is_err());
    }

    #[test]
    fn test_large_integers_are_exact() {
        let big = 9_007_199_254_740_993_i64;
        assert_eq!(i64::from_json(&json!(big), ctx()).unwrap(), big);
    }

    #[test]
    fn test_float_accepts_integers() {
        assert_eq!(f64::from_json(&json!(3), ctx()).unwrap(), 3.0);
    }

    #[test]
    fn test_vec_reports_index() {
        let err = Vec::<i32>::from_json(&json!([1, "two", 3]), ctx()).unwrap_err();
        match err {
            JsonryError::TypeMismatch { index, json_type, .. } => {
                assert_eq!(index, Some(1));
                assert_eq!(json_type, "string");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_null_string_map() {
        let map = NullStringMap::from_json(&json!({"a": "x", "b": null}), ctx()).unwrap();
        assert_eq!(map["a"], NullString::new("x"));
        assert!(!map["b"].is_set);
        assert_eq!(map.to_json(), json!({"a": "x", "b": null}));
    }

    #[test]
    fn test_null_decodes_to_zero() {
        assert_eq!(String::from_json(&Value::Null, ctx()).unwrap(), "");
        assert_eq!(Option::<i32>::from_json(&Value::Null, ctx()).unwrap(), None);
        assert!(Vec::<String>::from_json(&Value::Null, ctx()).unwrap().is_empty());
    }
}
