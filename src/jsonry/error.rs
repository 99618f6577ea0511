//
//  cf-client
//  jsonry/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use serde_json::Value;
use thiserror::Error;

/// Errors raised while mapping JSON onto a jsonry type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JsonryError {
    /// A value was found at a field's path but cannot become the field's type.
    #[error("cannot unmarshal {value} type \"{json_type}\" into field \"{field}\"{} (type \"{target}\")", .index.map(|i| format!(" index {}", i)).unwrap_or_default())]
    TypeMismatch {
        field: String,
        value: String,
        json_type: &'static str,
        target: &'static str,
        index: Option<usize>,
    },

    /// The document is not a JSON object.
    #[error("expected a JSON object for {target}, found {json_type}")]
    NotAnObject {
        target: &'static str,
        json_type: &'static str,
    },

    #[error("malformed JSON: {0}")]
    Malformed(String),
}

/// Names the JSON type of `value` the way error messages expect.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
