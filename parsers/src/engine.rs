//! Generic line-extraction engine.
//!
//! Every show-command parser is the same machine pointed at a different
//! rule set: split the output into lines, strip each line, try that
//! command's [`LineRule`]s in a fixed priority order, and let the first
//! matching rule's handler update the parser state. Lines matching no rule
//! (headers, banners, separators) are skipped silently — the rule set is a
//! deliberate subset of all possible output lines.
//!
//! The shared coercion helpers in this module encode the textual
//! conventions of the whole parser family: `--`/`N/A` placeholders,
//! `Enabled`/`TRUE` boolean tokens, int-or-placeholder fields, inline
//! comma lists, and IPv4/IPv6 classification by literal form.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use netshow_core::{Schema, Value, validate};

use crate::error::ParseError;

/// Handler invoked when a rule's pattern matches a line.
pub type Handler<S> = Box<dyn Fn(&Captures<'_>, &mut S) -> Result<(), ParseError>>;

/// One (pattern, handler) pair of a command's rule cascade.
///
/// Patterns are anchored at the start of the (stripped) line; rules are
/// tried in declaration order and the first match wins.
pub struct LineRule<S> {
    name: &'static str,
    pattern: &'static Regex,
    handler: Handler<S>,
}

impl<S> LineRule<S> {
    /// Creates a rule.
    pub fn new(
        name: &'static str,
        pattern: &'static Regex,
        handler: impl Fn(&Captures<'_>, &mut S) -> Result<(), ParseError> + 'static,
    ) -> Self {
        Self {
            name,
            pattern,
            handler: Box::new(handler),
        }
    }

    /// Rule name, used in trace logging and context errors.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Drives one parse run: strips each line of `text` and applies the first
/// matching rule, threading `state` through every handler.
///
/// Handlers own all structure building; `scan_lines` itself never touches
/// the result. Errors from handlers abort the scan immediately.
pub fn scan_lines<S>(text: &str, rules: &[LineRule<S>], state: &mut S) -> Result<(), ParseError> {
    let mut matched = 0usize;
    let mut total = 0usize;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        total += 1;
        for rule in rules {
            if let Some(caps) = rule.pattern.captures(line) {
                trace!(rule = rule.name, line, "line rule matched");
                (rule.handler)(&caps, state)?;
                matched += 1;
                break;
            }
        }
    }

    debug!(matched, total, "line scan complete");
    Ok(())
}

/// Finalizes a parse run: rejects empty results, validates the structure
/// against the command's schema, and hands it back untouched.
pub fn finish(out: Value, schema: &Schema) -> Result<Value, ParseError> {
    if out.is_empty_map() {
        return Err(ParseError::EmptyResult);
    }
    validate(schema, &out)?;
    Ok(out)
}

/// Parses the named capture group as an integer field.
///
/// The group must be present (patterns only call this for non-optional
/// digit groups); a value that overflows `i64` is surfaced as
/// [`ParseError::InvalidInteger`] rather than wrapped.
pub fn int_group(caps: &Captures<'_>, name: &'static str) -> Result<i64, ParseError> {
    let text = &caps[name];
    text.parse().map_err(|_| ParseError::InvalidInteger {
        field: name,
        text: text.to_string(),
    })
}

/// Borrows the named capture group as a trimmed string.
pub fn str_group<'t>(caps: &'t Captures<'t>, name: &str) -> &'t str {
    caps[name].trim()
}

/// Parses a numeric field that uses `--` or `N/A` as its "absent" token;
/// placeholders coerce to `0`.
pub fn int_or_zero(token: &str, field: &'static str) -> Result<i64, ParseError> {
    if is_placeholder(token) {
        return Ok(0);
    }
    token.parse().map_err(|_| ParseError::InvalidInteger {
        field,
        text: token.to_string(),
    })
}

/// Coerces a field that is numeric except for literal placeholders, which
/// are kept verbatim (the `Or(int, str)` schema shape).
pub fn int_or_text(token: &str) -> Value {
    match token.parse::<i64>() {
        Ok(n) if token.chars().all(|ch| ch.is_ascii_digit()) => Value::Int(n),
        _ => Value::from(token),
    }
}

/// `true` for the placeholder tokens meaning "absent/none".
pub fn is_placeholder(token: &str) -> bool {
    matches!(token, "--" | "N/A" | "n/a")
}

/// Normalizes an `Enabled`/`Disabled` flag, case-insensitively.
pub fn enabled_flag(token: &str) -> bool {
    token.eq_ignore_ascii_case("enabled")
}

/// Normalizes a `TRUE`/`FALSE` token, case-insensitively. Returns `None`
/// for anything else so the caller can keep unexpected tokens textual.
pub fn bool_token(token: &str) -> Option<bool> {
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Splits an inline comma-delimited list (`1450101, 1650205, 1850309`)
/// into an ordered sequence of trimmed string values.
pub fn split_comma_list(text: &str) -> Value {
    Value::List(
        text.split(',')
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
            .map(Value::from)
            .collect(),
    )
}

/// Splits a space-delimited list into an ordered sequence of string values.
pub fn split_space_list(text: &str) -> Value {
    Value::List(text.split_whitespace().map(Value::from).collect())
}

/// Address family of one captured address token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// The family bucket key used in parsed structures.
    pub fn key(self) -> &'static str {
        match self {
            AddressFamily::Ipv4 => "ipv4",
            AddressFamily::Ipv6 => "ipv6",
        }
    }
}

static DOTTED_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+\.\d+$").expect("static regex must compile"));

/// Classifies an address token by literal form: dotted-decimal is IPv4,
/// anything else (colon/hex notation) is IPv6.
///
/// Classification is per-token, never by surrounding context or command
/// argument; mixed-family tables bucket each address independently.
pub fn classify_address(token: &str) -> AddressFamily {
    if DOTTED_DECIMAL.is_match(token) {
        AddressFamily::Ipv4
    } else {
        AddressFamily::Ipv6
    }
}
