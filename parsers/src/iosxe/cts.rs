//! Parser for `show cts rbacl`.
//!
//! The output is a header followed by one block per role-based ACL. Each
//! block names the RBACL, lists its attributes as `key = value` lines, and
//! closes with the access-control entries, one per line:
//!
//! ```text
//! CTS RBACL Policy
//! ================
//! RBACL IP Version Supported: IPv4 & IPv6
//!   name   = TCP_51005-01
//!   IP protocol version = IPV4
//!   refcnt = 2
//!   flag   = 0x41000000
//!   stale  = FALSE
//!   RBACL ACEs:
//!     permit tcp dst eq 51005
//! ```
//!
//! ACEs are keyed by a 1-based integer index that restarts for every
//! RBACL block.

use std::sync::LazyLock;

use regex::Regex;

use netshow_core::{Field, Key, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;

pub const CLI_COMMAND: &str = "show cts rbacl";

struct Patterns {
    // RBACL IP Version Supported: IPv4 & IPv6
    ip_ver_support: Regex,
    //   name   = TCP_51005-01
    name: Regex,
    //   IP protocol version = IPV4
    ip_protocol_version: Regex,
    //   refcnt = 2
    refcnt: Regex,
    //   flag   = 0x41000000
    flag: Regex,
    //   stale  = FALSE
    stale: Regex,
    //     permit tcp dst eq 51005
    ace: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    ip_ver_support: Regex::new(r"^RBACL IP Version Supported: +(?P<ip_ver_support>.+)$")
        .expect("static regex must compile"),
    name: Regex::new(r"^name += +(?P<name>\S+)$").expect("static regex must compile"),
    ip_protocol_version: Regex::new(r"^IP protocol version += +(?P<ip_protocol_version>\S+)$")
        .expect("static regex must compile"),
    refcnt: Regex::new(r"^refcnt += +(?P<refcnt>\d+)$").expect("static regex must compile"),
    flag: Regex::new(r"^flag += +(?P<flag>\S+)$").expect("static regex must compile"),
    stale: Regex::new(r"^stale += +(?P<stale>TRUE|FALSE|True|False|true|false)$")
        .expect("static regex must compile"),
    ace: Regex::new(
        r"^(?P<action>permit|deny) +(?P<protocol>\S+)( +(?P<direction>src|dst) +eq +(?P<port>\d+))?$",
    )
    .expect("static regex must compile"),
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let ace = Schema::mapping(vec![
        Field::required("action", Schema::Str),
        Field::required("protocol", Schema::Str),
        Field::optional("direction", Schema::Str),
        Field::optional("port", Schema::Int),
    ]);
    let rbacl = Schema::mapping(vec![
        Field::required("ip_protocol_version", Schema::Str),
        Field::required("refcnt", Schema::Int),
        Field::required("flag", Schema::Str),
        Field::required("stale", Schema::Bool),
        Field::any(ace),
    ]);
    Schema::mapping(vec![Field::required(
        "cts_rbacl",
        Schema::mapping(vec![
            Field::required("ip_ver_support", Schema::Str),
            Field::any(rbacl),
        ]),
    )])
});

/// Declared shape of [`parse`]'s result.
pub fn schema() -> &'static Schema {
    &SCHEMA
}

#[derive(Default)]
struct State {
    out: Value,
    name: Option<String>,
    ace_index: i64,
}

impl State {
    fn new() -> Self {
        Self {
            out: Value::map(),
            name: None,
            ace_index: 0,
        }
    }

    fn rbacl(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        let name = self
            .name
            .as_deref()
            .ok_or(ParseError::MissingContext {
                rule,
                context: "name",
            })?
            .to_string();
        Ok(self.out.entry("cts_rbacl").entry(name))
    }
}

/// Builds a rule that attaches one string attribute to the current RBACL.
fn attr_rule(
    name: &'static str,
    pattern: &'static Regex,
) -> LineRule<State> {
    LineRule::new(name, pattern, move |caps, state: &mut State| {
        let value = engine::str_group(caps, name).to_string();
        state.rbacl(name)?.insert(name, value);
        Ok(())
    })
}

fn rules() -> Vec<LineRule<State>> {
    vec![
        LineRule::new(
            "ip_ver_support",
            &PATTERNS.ip_ver_support,
            |caps, state: &mut State| {
                let supported = engine::str_group(caps, "ip_ver_support").to_string();
                state.out.entry("cts_rbacl").insert("ip_ver_support", supported);
                Ok(())
            },
        ),
        LineRule::new("name", &PATTERNS.name, |caps, state: &mut State| {
            let name = engine::str_group(caps, "name").to_string();
            state.out.entry("cts_rbacl").entry(name.clone());
            state.name = Some(name);
            state.ace_index = 0;
            Ok(())
        }),
        attr_rule("ip_protocol_version", &PATTERNS.ip_protocol_version),
        LineRule::new("refcnt", &PATTERNS.refcnt, |caps, state: &mut State| {
            let refcnt = engine::int_group(caps, "refcnt")?;
            state.rbacl("refcnt")?.insert("refcnt", refcnt);
            Ok(())
        }),
        attr_rule("flag", &PATTERNS.flag),
        LineRule::new("stale", &PATTERNS.stale, |caps, state: &mut State| {
            // The pattern only admits TRUE/FALSE spellings.
            let stale = engine::bool_token(&caps["stale"]).unwrap_or(false);
            state.rbacl("stale")?.insert("stale", stale);
            Ok(())
        }),
        LineRule::new("ace", &PATTERNS.ace, |caps, state: &mut State| {
            let action = engine::str_group(caps, "action").to_string();
            let protocol = engine::str_group(caps, "protocol").to_string();
            let direction = caps.name("direction").map(|m| m.as_str().to_string());
            let port = match caps.name("port") {
                Some(m) => Some(engine::int_or_zero(m.as_str(), "port")?),
                None => None,
            };

            state.ace_index += 1;
            let index = state.ace_index;
            let ace = state.rbacl("ace")?.entry(Key::Int(index));
            ace.insert("action", action);
            ace.insert("protocol", protocol);
            if let Some(direction) = direction {
                ace.insert("direction", direction);
            }
            if let Some(port) = port {
                ace.insert("port", port);
            }
            Ok(())
        }),
    ]
}

/// Parses pre-captured `show cts rbacl` output.
pub fn parse(output: &str) -> Result<Value, ParseError> {
    let mut state = State::new();
    engine::scan_lines(output, &rules(), &mut state)?;
    engine::finish(state.out, schema())
}

/// Executes `show cts rbacl` on `device` and parses its output.
pub fn from_device(device: &mut dyn Device) -> Result<Value, ParseError> {
    let output = device.execute(CLI_COMMAND)?;
    parse(&output)
}
