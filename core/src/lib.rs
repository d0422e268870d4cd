//! Value model and schema engine for parsed network CLI output.
//!
//! This crate defines the foundational types shared by every show-command
//! parser:
//!
//! - [`Value`] / [`Key`] — the dynamic nested structure a parser builds
//!   line-by-line (mappings with string or integer keys, sequences, and
//!   string/integer/boolean leaves).
//! - [`Schema`] / [`Field`] — the declared shape of one command's result:
//!   required and optional keys, wildcard keys, type alternation, sequences,
//!   and named check nodes.
//! - [`validate`] — the single generic validator interpreting a schema tree
//!   against a value, producing [`SchemaError`]s with dotted paths.
//!
//! # Example
//!
//! ```
//! use netshow_core::{Field, Schema, Value, validate};
//!
//! // Declared shape: a table of LSPs keyed by name.
//! let schema = Schema::mapping(vec![Field::required(
//!     "lsps",
//!     Schema::mapping(vec![Field::any(Schema::mapping(vec![
//!         Field::required("destination", Schema::Str),
//!         Field::required("flap_count", Schema::Int),
//!         Field::optional("tunnel_interface", Schema::Str),
//!     ]))]),
//! )]);
//!
//! // Structure built the way a line parser builds it.
//! let mut out = Value::map();
//! let lsp = out.entry("lsps").entry("mlx8.1_to_ces.2");
//! lsp.insert("destination", "1.1.1.1");
//! lsp.insert("flap_count", 1);
//!
//! assert!(validate(&schema, &out).is_ok());
//! ```

mod schema;
mod validate;
mod value;

pub use schema::{Check, Field, FieldKey, Schema};
pub use validate::{SchemaError, validate};
pub use value::{Key, Map, Value};
