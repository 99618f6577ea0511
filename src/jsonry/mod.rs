//
//  cf-client
//  jsonry/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Path-Based JSON Mapping
//!
//! Cloud Controller resources are deeply nested JSON documents, while the
//! types callers want to work with are flat. `jsonry` bridges the two: every
//! field of a struct declares the path where its value lives, and the codec
//! walks that path in both directions.
//!
//! ## Overview
//!
//! - [`jsonry!`](crate::jsonry!) - Declares a struct and its path tags
//! - [`marshal`] / [`to_string`] - Struct to JSON
//! - [`unmarshal`] / [`from_slice`] - JSON to struct
//! - [`JsonryField`] - Conversions for individual field types
//! - [`NullString`] / [`NullStringMap`] - Strings that may be JSON `null`
//!
//! ## Path semantics
//!
//! | Tag | Marshal | Unmarshal |
//! |-----|---------|-----------|
//! | `a.b` | `{"a":{"b":v}}` | value at `a.b` |
//! | `a[].b` | each element of `v` goes into `a[i].b` | `b` from every element of `a` |
//! | `x,omitempty` | skipped when zero | - |
//!
//! A path that does not resolve leaves the field at its default. A value
//! that cannot convert to the field's type is a [`JsonryError::TypeMismatch`]
//! naming the field, the value, its JSON type, the target type and the list
//! index when there is one.
//!
//! ## Example
//!
//! ```rust
//! use cf_client::jsonry;
//!
//! cf_client::jsonry! {
//!     #[derive(Debug, Clone, Default, PartialEq)]
//!     pub struct Space {
//!         #[jsonry = "metadata.guid"]
//!         pub guid: String,
//!         #[jsonry = "entity.name"]
//!         pub name: String,
//!         #[jsonry = "entity.developers[].guid,omitempty"]
//!         pub developer_guids: Vec<String>,
//!     }
//! }
//!
//! let space = Space {
//!     guid: "s-1".into(),
//!     name: "dev".into(),
//!     developer_guids: vec!["u-1".into(), "u-2".into()],
//! };
//!
//! let json = jsonry::marshal(&space);
//! assert_eq!(json["entity"]["developers"][1]["guid"], "u-2");
//!
//! let back: Space = jsonry::unmarshal(&json).unwrap();
//! assert_eq!(back, space);
//! ```
//!
//! # Notes
//!
//! - Path descriptors are parsed once per type and cached
//! - Types declared with the macro also implement `serde::Serialize` and
//!   `serde::Deserialize` through the same paths

mod error;
mod field;
mod path;
mod tree;

pub use error::*;
pub use field::*;
pub use path::*;

use serde_json::{Map, Value};

#[doc(hidden)]
pub use once_cell::sync::OnceCell as __OnceCell;
#[doc(hidden)]
pub use serde as __serde;
#[doc(hidden)]
pub use serde_json as __serde_json;

/// Reads a field's value out of its struct.
pub type MarshalFn<T> = fn(&T) -> Value;
/// Reports whether a field holds its zero value.
pub type IsZeroFn<T> = fn(&T) -> bool;
/// Converts a JSON value into a field and stores it.
pub type UnmarshalFn<T> = fn(&mut T, &Value, Context<'_>) -> Result<(), JsonryError>;

/// One field of a jsonry type.
pub struct Field<T> {
    pub name: &'static str,
    pub path: Path,
    marshal: MarshalFn<T>,
    is_zero: IsZeroFn<T>,
    unmarshal: UnmarshalFn<T>,
}

impl<T> Field<T> {
    pub fn new(
        name: &'static str,
        tag: &str,
        marshal: MarshalFn<T>,
        is_zero: IsZeroFn<T>,
        unmarshal: UnmarshalFn<T>,
    ) -> Self {
        Self {
            name,
            path: Path::parse(tag, name),
            marshal,
            is_zero,
            unmarshal,
        }
    }
}

/// The cached field table of a jsonry type.
pub struct Descriptor<T> {
    pub type_name: &'static str,
    pub fields: Vec<Field<T>>,
}

impl<T> Descriptor<T> {
    pub fn new(type_name: &'static str, fields: Vec<Field<T>>) -> Self {
        Self { type_name, fields }
    }
}

/// Types that map to JSON through path tags.
///
/// Implemented by the [`jsonry!`](crate::jsonry!) macro.
pub trait Jsonry: Default + Sized + 'static {
    fn descriptor() -> &'static Descriptor<Self>;
}

/// Converts `value` into a JSON object.
pub fn marshal<T: Jsonry>(value: &T) -> Value {
    let mut tree = Map::new();
    for field in &T::descriptor().fields {
        if field.path.omit_empty && (field.is_zero)(value) {
            continue;
        }
        tree::attach(&mut tree, &field.path.segments, (field.marshal)(value));
    }
    Value::Object(tree)
}

/// Converts `value` into a JSON string.
pub fn to_string<T: Jsonry>(value: &T) -> String {
    marshal(value).to_string()
}

/// Populates a `T` from a JSON object.
///
/// # Errors
///
/// - [`JsonryError::NotAnObject`] if `json` is not an object
/// - [`JsonryError::TypeMismatch`] if a field's value has the wrong type
pub fn unmarshal<T: Jsonry>(json: &Value) -> Result<T, JsonryError> {
    let descriptor = T::descriptor();
    let tree = json.as_object().ok_or(JsonryError::NotAnObject {
        target: descriptor.type_name,
        json_type: json_type_name(json),
    })?;

    let mut out = T::default();
    for field in &descriptor.fields {
        if let Some(found) = tree::fetch(tree, &field.path.segments) {
            (field.unmarshal)(&mut out, &found, Context::field(field.name))?;
        }
    }
    Ok(out)
}

/// Parses `bytes` and unmarshals them into a `T`.
pub fn from_slice<T: Jsonry>(bytes: &[u8]) -> Result<T, JsonryError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| JsonryError::Malformed(e.to_string()))?;
    unmarshal(&value)
}

/// `true` when every field of `value` holds its zero value.
pub fn is_zero<T: Jsonry>(value: &T) -> bool {
    T::descriptor().fields.iter().all(|f| (f.is_zero)(value))
}

/// Declares one or more structs whose fields map to JSON by path.
///
/// Every field carries a `#[jsonry = "path,options"]` attribute. An empty
/// path falls back to the lower-cased field name. The macro implements
/// [`Jsonry`], [`JsonryField`] (so the struct can nest inside another), and
/// serde's `Serialize` and `Deserialize`.
///
/// ```rust
/// cf_client::jsonry! {
///     #[derive(Debug, Default)]
///     pub struct Link {
///         #[jsonry = ""]
///         pub href: String,
///     }
/// }
/// ```
#[macro_export]
macro_rules! jsonry {
    ($(
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                #[jsonry = $tag:literal]
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    )*) => {$(
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::jsonry::Jsonry for $name {
            fn descriptor() -> &'static $crate::jsonry::Descriptor<Self> {
                static DESCRIPTOR: $crate::jsonry::__OnceCell<$crate::jsonry::Descriptor<$name>> =
                    $crate::jsonry::__OnceCell::new();
                DESCRIPTOR.get_or_init(|| {
                    $crate::jsonry::Descriptor::new(stringify!($name), vec![$(
                        $crate::jsonry::Field::new(
                            stringify!($field),
                            $tag,
                            |v: &$name| $crate::jsonry::JsonryField::to_json(&v.$field),
                            |v: &$name| $crate::jsonry::JsonryField::is_zero(&v.$field),
                            |v: &mut $name, json: &$crate::jsonry::__serde_json::Value, ctx: $crate::jsonry::Context<'_>| {
                                v.$field = <$fty as $crate::jsonry::JsonryField>::from_json(json, ctx)?;
                                Ok(())
                            },
                        ),
                    )*])
                })
            }
        }

        impl $crate::jsonry::JsonryField for $name {
            fn to_json(&self) -> $crate::jsonry::__serde_json::Value {
                $crate::jsonry::marshal(self)
            }

            fn from_json(
                value: &$crate::jsonry::__serde_json::Value,
                _ctx: $crate::jsonry::Context<'_>,
            ) -> ::std::result::Result<Self, $crate::jsonry::JsonryError> {
                match value {
                    $crate::jsonry::__serde_json::Value::Null => Ok(<$name as ::std::default::Default>::default()),
                    other => $crate::jsonry::unmarshal(other),
                }
            }

            fn is_zero(&self) -> bool {
                $crate::jsonry::is_zero(self)
            }
        }

        impl $crate::jsonry::__serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: $crate::jsonry::__serde::Serializer,
            {
                $crate::jsonry::__serde::Serialize::serialize(&$crate::jsonry::marshal(self), serializer)
            }
        }

        impl<'de> $crate::jsonry::__serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: $crate::jsonry::__serde::Deserializer<'de>,
            {
                let value: $crate::jsonry::__serde_json::Value =
                    $crate::jsonry::__serde::Deserialize::deserialize(deserializer)?;
                $crate::jsonry::unmarshal(&value).map_err(<D::Error as $crate::jsonry::__serde::de::Error>::custom)
            }
        }
    )*};
}
