//! Schema validation for parsed output structures.
//!
//! [`validate`] recursively checks a [`Value`] against a [`Schema`] tree.
//! Validation is total and all-or-nothing: every leaf of the actual
//! structure must be accepted by some schema node, or a [`SchemaError`]
//! naming the offending path is returned. Validation never mutates the
//! value and has no lenient mode.
//!
//! # Examples
//!
//! ```
//! use netshow_core::{Field, Schema, SchemaError, Value, validate};
//!
//! let schema = Schema::mapping(vec![Field::required("state", Schema::Str)]);
//!
//! let mut record = Value::map();
//! record.insert("state", "UP");
//! record.insert("extra", 1);
//!
//! let err = validate(&schema, &record).unwrap_err();
//! assert!(matches!(err, SchemaError::UnexpectedKey { .. }));
//! ```

use thiserror::Error;

use crate::schema::{FieldKey, Schema};
use crate::value::Value;

/// A structural mismatch between a parsed value and its declared schema.
///
/// Every variant carries the dotted path from the structure root to the
/// offending node (`$` is the root). A schema error out of a parser
/// indicates a rule/schema mismatch bug and is meant to fail loudly in
/// tests, never to be swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Value has a different kind than the schema declares.
    #[error("{path}: expected {expected}, found {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
    /// A required mapping key is absent.
    #[error("{path}: missing required key '{key}'")]
    MissingKey { path: String, key: String },
    /// A mapping key is neither declared nor covered by a wildcard field.
    #[error("{path}: undeclared key '{key}'")]
    UnexpectedKey { path: String, key: String },
    /// No alternative of an `Or` node accepted the value.
    #[error("{path}: no alternative matched (tried {tried}), found {actual}")]
    NoAlternative {
        path: String,
        tried: String,
        actual: String,
    },
    /// A `Use` check node rejected the value.
    #[error("{path}: check '{check}' failed: {message}")]
    CheckFailed {
        path: String,
        check: &'static str,
        message: String,
    },
}

pub(crate) fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        "$".to_string()
    } else {
        format!("$.{}", path.join("."))
    }
}

/// Validates `value` against `schema`.
///
/// Returns `Ok(())` when the whole structure conforms; the caller then
/// returns the (unchanged) structure to its own caller.
///
/// # Examples
///
/// ```
/// use netshow_core::{Field, Schema, Value, validate};
///
/// // A table keyed by arbitrary interface names (wildcard key).
/// let schema = Schema::mapping(vec![Field::any(Schema::mapping(vec![
///     Field::required("state", Schema::Str),
/// ]))]);
///
/// let mut table = Value::map();
/// table.entry("Tunnel84").insert("state", "UP");
/// table.entry("Tunnel90").insert("state", "DOWN");
/// assert!(validate(&schema, &table).is_ok());
/// ```
pub fn validate(schema: &Schema, value: &Value) -> Result<(), SchemaError> {
    let mut path = Vec::new();
    validate_at(schema, value, &mut path)
}

pub(crate) fn validate_at(
    schema: &Schema,
    value: &Value,
    path: &mut Vec<String>,
) -> Result<(), SchemaError> {
    match schema {
        Schema::Str => match value {
            Value::Str(_) => Ok(()),
            other => Err(type_mismatch(path, "string", other)),
        },
        Schema::Int => match value {
            Value::Int(_) => Ok(()),
            other => Err(type_mismatch(path, "integer", other)),
        },
        Schema::Bool => match value {
            Value::Bool(_) => Ok(()),
            other => Err(type_mismatch(path, "boolean", other)),
        },
        Schema::Or(alternatives) => {
            for alternative in alternatives {
                if validate_at(alternative, value, path).is_ok() {
                    return Ok(());
                }
            }
            Err(SchemaError::NoAlternative {
                path: render_path(path),
                tried: schema.expected(),
                actual: value.kind().to_string(),
            })
        }
        Schema::Seq(element) => match value {
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    path.push(index.to_string());
                    let result = validate_at(element, item, path);
                    path.pop();
                    result?;
                }
                Ok(())
            }
            other => Err(type_mismatch(path, "sequence", other)),
        },
        Schema::Map(fields) => match value {
            Value::Map(map) => {
                let wildcard = fields
                    .iter()
                    .find(|field| matches!(field.key, FieldKey::Any));

                for (key, entry) in map {
                    let declared = fields
                        .iter()
                        .find(|field| matches!(&field.key, FieldKey::Exact(k) if k == key));
                    let field = match declared.or(wildcard) {
                        Some(field) => field,
                        None => {
                            return Err(SchemaError::UnexpectedKey {
                                path: render_path(path),
                                key: key.to_string(),
                            });
                        }
                    };
                    path.push(key.to_string());
                    let result = validate_at(&field.schema, entry, path);
                    path.pop();
                    result?;
                }

                for field in fields {
                    if let (true, FieldKey::Exact(key)) = (field.required, &field.key) {
                        if !map.contains_key(key) {
                            return Err(SchemaError::MissingKey {
                                path: render_path(path),
                                key: key.to_string(),
                            });
                        }
                    }
                }
                Ok(())
            }
            other => Err(type_mismatch(path, "mapping", other)),
        },
        Schema::Use(check) => check.run(value, path),
    }
}

fn type_mismatch(path: &[String], expected: &str, actual: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        path: render_path(path),
        expected: expected.to_string(),
        actual: actual.kind().to_string(),
    }
}
