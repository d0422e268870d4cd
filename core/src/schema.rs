//! Declarative schema tree for parsed command output.
//!
//! Each parser declares the shape of its result as data: a tree of
//! [`Schema`] nodes interpreted by one generic validator
//! ([`validate`](crate::validate)). The node kinds cover everything the
//! show-command family needs:
//!
//! - literal leaves ([`Schema::Str`], [`Schema::Int`], [`Schema::Bool`]),
//! - alternation ([`Schema::Or`]) for fields that are sometimes numeric and
//!   sometimes a placeholder string,
//! - sequences ([`Schema::Seq`]),
//! - mappings ([`Schema::Map`]) with required/optional named fields and an
//!   optional wildcard field matching any undeclared key,
//! - named check nodes ([`Schema::Use`]) that run a custom test before
//!   structural validation, e.g. "is a sequence whose every element matches
//!   this record shape".
//!
//! # Examples
//!
//! ```
//! use netshow_core::{Field, Schema, Value, validate};
//!
//! let schema = Schema::mapping(vec![
//!     Field::required("type", Schema::Str),
//!     Field::required("total_peers", Schema::Int),
//!     Field::optional("path", Schema::Str),
//! ]);
//!
//! let mut record = Value::map();
//! record.insert("type", "Spoke");
//! record.insert("total_peers", 1);
//! assert!(validate(&schema, &record).is_ok());
//!
//! record.insert("total_peers", "one");
//! assert!(validate(&schema, &record).is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::validate::{SchemaError, validate_at};
use crate::value::{Key, Value};

/// Check function carried by a [`Schema::Use`] node.
type CheckFn = Arc<dyn Fn(&Value, &[String]) -> Result<(), SchemaError> + Send + Sync>;

/// A named check applied to a value before/instead of plain structural
/// validation. The slice argument is the current path, for error reporting.
#[derive(Clone)]
pub struct Check {
    name: &'static str,
    check: CheckFn,
}

impl Check {
    /// Creates a named check node.
    pub fn new(
        name: &'static str,
        check: impl Fn(&Value, &[String]) -> Result<(), SchemaError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            check: Arc::new(check),
        }
    }

    /// Name shown in error messages and debug output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn run(&self, value: &Value, path: &[String]) -> Result<(), SchemaError> {
        (self.check)(value, path)
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Check").field(&self.name).finish()
    }
}

/// One node in a schema tree.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Value must be a string.
    Str,
    /// Value must be an integer.
    Int,
    /// Value must be a boolean.
    Bool,
    /// Value must conform to one of the alternatives.
    Or(Vec<Schema>),
    /// Value must be a sequence whose every element conforms to the inner
    /// schema. Empty sequences are valid.
    Seq(Box<Schema>),
    /// Value must be a mapping conforming to the listed fields.
    Map(Vec<Field>),
    /// Value must pass the named check.
    Use(Check),
}

impl Schema {
    /// Mapping schema from a field list.
    pub fn mapping(fields: Vec<Field>) -> Schema {
        Schema::Map(fields)
    }

    /// Sequence schema.
    pub fn seq(element: Schema) -> Schema {
        Schema::Seq(Box::new(element))
    }

    /// Alternation schema.
    ///
    /// # Examples
    ///
    /// ```
    /// use netshow_core::{Schema, Value, validate};
    ///
    /// // MPLS labels are numeric, or the literal placeholder "--".
    /// let label = Schema::or(vec![Schema::Int, Schema::Str]);
    /// assert!(validate(&label, &Value::Int(852217)).is_ok());
    /// assert!(validate(&label, &Value::from("--")).is_ok());
    /// assert!(validate(&label, &Value::Bool(true)).is_err());
    /// ```
    pub fn or(alternatives: Vec<Schema>) -> Schema {
        Schema::Or(alternatives)
    }

    /// Check node validating that the value is a sequence and that every
    /// element conforms to `element`.
    ///
    /// Unlike [`Schema::seq`], the sequence test itself is reported as a
    /// check failure ("not a sequence") rather than a plain type mismatch.
    pub fn each(element: Schema) -> Schema {
        Schema::Use(Check::new("each", move |value, path| match value {
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    let mut item_path = path.to_vec();
                    item_path.push(index.to_string());
                    validate_at(&element, item, &mut item_path)?;
                }
                Ok(())
            }
            other => Err(SchemaError::CheckFailed {
                path: crate::validate::render_path(path),
                check: "each",
                message: format!("expected a sequence, found {}", other.kind()),
            }),
        }))
    }

    /// Label used when listing alternatives in error messages.
    pub(crate) fn expected(&self) -> String {
        match self {
            Schema::Str => "string".to_string(),
            Schema::Int => "integer".to_string(),
            Schema::Bool => "boolean".to_string(),
            Schema::Or(alternatives) => alternatives
                .iter()
                .map(Schema::expected)
                .collect::<Vec<_>>()
                .join(" | "),
            Schema::Seq(_) => "sequence".to_string(),
            Schema::Map(_) => "mapping".to_string(),
            Schema::Use(check) => format!("check '{}'", check.name()),
        }
    }
}

/// How a [`Field`] matches keys of the mapping under validation.
#[derive(Debug, Clone)]
pub enum FieldKey {
    /// Matches exactly one declared key.
    Exact(Key),
    /// Wildcard: matches any key not claimed by an exact field. At most one
    /// wildcard field is consulted per mapping.
    Any,
}

/// One declared field of a [`Schema::Map`] node.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: FieldKey,
    pub required: bool,
    pub schema: Schema,
}

impl Field {
    /// Required field under an exact key.
    pub fn required(key: impl Into<Key>, schema: Schema) -> Field {
        Field {
            key: FieldKey::Exact(key.into()),
            required: true,
            schema,
        }
    }

    /// Optional field under an exact key: validated when present, skipped
    /// when absent.
    pub fn optional(key: impl Into<Key>, schema: Schema) -> Field {
        Field {
            key: FieldKey::Exact(key.into()),
            required: false,
            schema,
        }
    }

    /// Wildcard field: any undeclared key is permitted, and its value is
    /// validated against `schema`. Wildcards are never required.
    pub fn any(schema: Schema) -> Field {
        Field {
            key: FieldKey::Any,
            required: false,
            schema,
        }
    }
}
