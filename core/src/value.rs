//! Dynamic value model for parsed command output.
//!
//! Parsed "show" output is a nested structure whose shape is only known at
//! runtime: tables keyed by interface names or numeric ids, records with
//! mixed string/integer/boolean fields, and ordered lists of sub-records.
//! [`Value`] models exactly that, and [`Key`] allows integer table keys
//! (EVI ids, ACE indexes) alongside string keys (interface names, addresses).
//!
//! Builders mirror how line parsers populate the structure: intermediate
//! mappings are created on demand ([`Value::entry`]), repeated writes to the
//! same key overwrite ([`Value::insert`]), and first-write-wins is available
//! where a parser needs it ([`Value::or_insert`]).

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A mapping key in parsed output.
///
/// Show-command tables are keyed by whatever the establishing line captured:
/// usually an identifier string, but integer keys are common (VPN ids, rule
/// indexes, event counters) and must stay integers so callers can consume
/// them without re-parsing.
///
/// # Examples
///
/// ```
/// use netshow_core::Key;
///
/// assert_eq!(Key::from("Tunnel84").to_string(), "Tunnel84");
/// assert_eq!(Key::from(1000).to_string(), "1000");
/// assert_ne!(Key::from(7), Key::from("7"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Key {
    /// Integer key (e.g. an EVI id or a running record index).
    Int(i64),
    /// String key (e.g. an interface name or a MAC address).
    Str(String),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{n}"),
            Key::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

// Lets integer literals key tables without an `as i64`.
impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n.into())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

/// Ordered mapping from [`Key`] to [`Value`].
pub type Map = BTreeMap<Key, Value>;

/// A node in a parsed output structure.
///
/// Structures are built incrementally by line rules and handed to the schema
/// engine for validation once the scan completes. There is no partially
/// typed state: every leaf is a string, integer, or boolean, and every
/// branch is a sequence or a mapping.
///
/// # Examples
///
/// ```
/// use netshow_core::{Key, Value};
///
/// let mut out = Value::map();
/// out.entry("dmvpn").entry("Tunnel84").insert("type", "Spoke");
/// out.entry("dmvpn").entry("Tunnel84").insert("total_peers", 1);
///
/// let tunnel = out.get("dmvpn").and_then(|d| d.get("Tunnel84")).unwrap();
/// assert_eq!(tunnel.get("type").and_then(Value::as_str), Some("Spoke"));
/// assert_eq!(tunnel.get("total_peers").and_then(Value::as_int), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Textual field.
    Str(String),
    /// Numeric field (all counters in this domain fit `i64`).
    Int(i64),
    /// Boolean field (normalized from `Enabled`/`TRUE`/... tokens).
    Bool(bool),
    /// Ordered sequence, e.g. additional next-hop addresses.
    List(Vec<Value>),
    /// Nested record or table.
    Map(Map),
}

impl Value {
    /// Creates an empty mapping.
    pub fn map() -> Self {
        Value::Map(Map::new())
    }

    /// Creates an empty sequence.
    pub fn list() -> Self {
        Value::List(Vec::new())
    }

    /// Short name of this value's kind, used in validation errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::List(_) => "sequence",
            Value::Map(_) => "mapping",
        }
    }

    /// Returns the mapping entry for `key`, creating an empty mapping there
    /// if the key is absent.
    ///
    /// This is the create-on-demand primitive line rules use to navigate to
    /// their attachment point; existing sibling data is never overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a mapping. Parsers only ever call this on
    /// mappings they created, so a panic here is a programmer error, not a
    /// runtime condition.
    pub fn entry(&mut self, key: impl Into<Key>) -> &mut Value {
        self.or_insert(key, Value::map())
    }

    /// Returns the mapping entry for `key`, inserting `default` if absent.
    ///
    /// First write wins: an existing value is returned untouched.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a mapping (programmer error, as with
    /// [`entry`](Value::entry)).
    pub fn or_insert(&mut self, key: impl Into<Key>, default: Value) -> &mut Value {
        match self {
            Value::Map(map) => map.entry(key.into()).or_insert(default),
            other => panic!("or_insert() on non-mapping value ({})", other.kind()),
        }
    }

    /// Inserts `value` under `key`, overwriting any previous value.
    ///
    /// Duplicate establishing lines therefore resolve as last-write-wins,
    /// matching how repeated keys behave in the device output itself.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a mapping (programmer error).
    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        match self {
            Value::Map(map) => {
                map.insert(key.into(), value.into());
            }
            other => panic!("insert() on non-mapping value ({})", other.kind()),
        }
    }

    /// Appends `value` to a sequence.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a sequence (programmer error).
    pub fn push(&mut self, value: impl Into<Value>) {
        match self {
            Value::List(items) => items.push(value.into()),
            other => panic!("push() on non-sequence value ({})", other.kind()),
        }
    }

    /// Looks up `key` in a mapping. Returns `None` for absent keys and for
    /// non-mapping values.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(&key.into()),
            _ => None,
        }
    }

    /// Borrows the mapping form, if this is a mapping.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Mutably borrows the mapping form, if this is a mapping.
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrows the sequence form, if this is a sequence.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Borrows the string form, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer form, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean form, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// `true` when this is a mapping with no entries.
    ///
    /// A parse run whose result is an empty mapping produced no records at
    /// all and is reported as an empty result rather than returned.
    pub fn is_empty_map(&self) -> bool {
        matches!(self, Value::Map(map) if map.is_empty())
    }

    /// Serializes to [`serde_json::Value`] (integer keys become strings,
    /// as JSON requires).
    ///
    /// # Examples
    ///
    /// ```
    /// use netshow_core::Value;
    ///
    /// let mut out = Value::map();
    /// out.entry("evi").insert(1000, "VPWS:1000");
    /// assert_eq!(out.to_json(), serde_json::json!({"evi": {"1000": "VPWS:1000"}}));
    /// ```
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// The default value is an empty mapping, the shape every parse run
/// starts from.
impl Default for Value {
    fn default() -> Self {
        Value::map()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

// Lets integer literals flow into fields without an `as i64`.
impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl FromIterator<(Key, Value)> for Value {
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        Value::Map(iter.into_iter().collect())
    }
}
