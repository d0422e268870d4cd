//! Parser for `show mpls vll {vll}`.
//!
//! The output is a header naming the VLL, a local end-point block, and a
//! peer block:
//!
//! ```text
//! VLL VLL-TEST1, VC-ID 2456, VLL-INDEX 2
//!
//! End-point        : tagged  vlan 3043  e 2/5
//! End-Point state  : Up
//! Local VC MTU     : 9190
//! Extended Counters: Enabled
//!
//! Vll-Peer         : 192.168.1.1
//!     State          : UP
//!     Local label    : 852217            Remote label   : 852417
//!     Tunnel LSP     : mlx8.1_to_ces.2 (tnl15)
//! ```
//!
//! The result is keyed by the VLL name the caller asked for, not by the
//! name echoed in the header. Label and group-id columns are numeric or
//! the literal `--` placeholder, which is kept verbatim.

use std::sync::LazyLock;

use regex::Regex;

use netshow_core::{Field, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;

pub const CLI_COMMAND: &str = "show mpls vll {vll}";

struct Patterns {
    // VLL VLL-TEST1, VC-ID 2456, VLL-INDEX 2
    header: Regex,
    // End-point        : tagged  vlan 3043  e 2/5
    end_point: Regex,
    // End-Point state  : Up
    end_point_state: Regex,
    // MCT state        : None
    mct_state: Regex,
    // IFL-ID           : --
    ifl_id: Regex,
    // Local VC type    : tag
    local_vc_type: Regex,
    // Local VC MTU     : 9190
    local_vc_mtu: Regex,
    // COS              : --
    cos: Regex,
    // Extended Counters: Enabled
    extended_counters: Regex,
    // Counter          : disabled
    counter: Regex,
    // Vll-Peer         : 192.168.1.1
    peer: Regex,
    // State          : UP
    // State          : DOWN - PW is Down (Reason:Local PW is Down)
    peer_state: Regex,
    // Remote VC type : tag               Remote VC MTU  : 9190
    remote_vc: Regex,
    // Local label    : 852217            Remote label   : 852417
    labels: Regex,
    // Local group-id : 0                 Remote group-id: 0
    group_ids: Regex,
    // Tunnel LSP     : mlx8.1_to_ces.2 (tnl15)
    tunnel_lsp: Regex,
    // LSPs assigned  : No LSPs assigned
    lsps_assigned: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    header: Regex::new(
        r"^VLL +(?P<name>[^,]+), +VC-ID +(?P<vcid>\d+), +VLL-INDEX +(?P<vll_index>\d+)$",
    )
    .expect("static regex must compile"),
    end_point: Regex::new(
        r"^End-point +: +(?P<type>tagged|untagged)( +vlan +(?P<vlan_id>\d+))? +e +(?P<interface>\d{1,3}/\d{1,3})$",
    )
    .expect("static regex must compile"),
    end_point_state: Regex::new(r"^End-Point state +: +(?P<state>Up|Down)$")
        .expect("static regex must compile"),
    mct_state: Regex::new(r"^MCT state +: +(?P<mct_state>\S+)$")
        .expect("static regex must compile"),
    ifl_id: Regex::new(r"^IFL-ID +: +(?P<ifl_id>n/a|\d+|--)$").expect("static regex must compile"),
    local_vc_type: Regex::new(r"^Local VC type +: +(?P<vc_type>tag|raw-pass-through|raw-mode|--)$")
        .expect("static regex must compile"),
    local_vc_mtu: Regex::new(r"^Local VC MTU +: +(?P<mtu>\d+|--)$")
        .expect("static regex must compile"),
    cos: Regex::new(r"^COS +: +(?P<cos>\S+)$").expect("static regex must compile"),
    extended_counters: Regex::new(r"^Extended Counters: +(?P<extended_counters>[Ee]nabled|[Dd]isabled)$")
        .expect("static regex must compile"),
    counter: Regex::new(r"^Counter +: +(?P<counter>[Ee]nabled|[Dd]isabled)$")
        .expect("static regex must compile"),
    peer: Regex::new(r"^Vll-Peer +: +(?P<ip>\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3})$")
        .expect("static regex must compile"),
    peer_state: Regex::new(r"^State +: +(?P<state>UP|DOWN)( +[^(]+\(Reason:(?P<reason>[^)]+)\))?$")
        .expect("static regex must compile"),
    remote_vc: Regex::new(
        r"^Remote VC type +: +(?P<vc_type>tag|raw-pass-through|--) +Remote VC MTU +: +(?P<mtu>\d+|--)$",
    )
    .expect("static regex must compile"),
    labels: Regex::new(r"^Local label +: +(?P<local>\d+|--) +Remote label +: +(?P<remote>\d+|--)$")
        .expect("static regex must compile"),
    group_ids: Regex::new(
        r"^Local group-id +: +(?P<local>\d+|--) +Remote group-id: +(?P<remote>\d+|--)$",
    )
    .expect("static regex must compile"),
    tunnel_lsp: Regex::new(r"^Tunnel LSP +: +(?P<name>\S+) +\((?P<tunnel>\w+)\)$")
        .expect("static regex must compile"),
    lsps_assigned: Regex::new(r"^LSPs +assigned +: +(?P<lsps>\w+.*)$")
        .expect("static regex must compile"),
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let int_or_placeholder = Schema::or(vec![Schema::Int, Schema::Str]);
    let local = Schema::mapping(vec![
        Field::required("type", Schema::Str),
        Field::required("interface", Schema::Str),
        Field::optional("vlan_id", Schema::Int),
        Field::required("state", Schema::Str),
        Field::optional("mct_state", Schema::Str),
        Field::optional("ifl_id", Schema::Str),
        Field::required("vc_type", Schema::Str),
        Field::required("mtu", Schema::Int),
        Field::required("cos", Schema::Str),
        Field::optional("extended_counters", Schema::Bool),
        Field::optional("counters", Schema::Bool),
    ]);
    let peer = Schema::mapping(vec![
        Field::required("ip", Schema::Str),
        Field::required("state", Schema::Str),
        Field::optional("reason", Schema::Str),
        Field::required("vc_type", Schema::Str),
        Field::required("mtu", Schema::Int),
        Field::required("local_label", int_or_placeholder.clone()),
        Field::required("remote_label", int_or_placeholder.clone()),
        Field::required("local_group_id", int_or_placeholder.clone()),
        Field::required("remote_group_id", int_or_placeholder),
        Field::required(
            "tunnel_lsp",
            Schema::mapping(vec![
                Field::required("name", Schema::Str),
                Field::optional("tunnel_interface", Schema::Str),
            ]),
        ),
        Field::required("lsps_assigned", Schema::Str),
    ]);
    let vll = Schema::mapping(vec![
        Field::required("vcid", Schema::Int),
        Field::required("vll_index", Schema::Int),
        Field::required("local", local),
        Field::required("peer", peer),
    ]);
    Schema::mapping(vec![Field::required(
        "vll",
        Schema::mapping(vec![Field::any(vll)]),
    )])
});

/// Declared shape of [`parse`]'s result.
pub fn schema() -> &'static Schema {
    &SCHEMA
}

struct State {
    out: Value,
    vll: String,
    has_vll: bool,
    has_local: bool,
    has_peer: bool,
}

impl State {
    fn new(vll: &str) -> Self {
        Self {
            out: Value::map(),
            vll: vll.to_string(),
            has_vll: false,
            has_local: false,
            has_peer: false,
        }
    }

    fn vll_entry(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        if !self.has_vll {
            return Err(ParseError::MissingContext {
                rule,
                context: "vll",
            });
        }
        let name = self.vll.clone();
        Ok(self.out.entry("vll").entry(name))
    }

    fn local(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        if !self.has_local {
            return Err(ParseError::MissingContext {
                rule,
                context: "end_point",
            });
        }
        Ok(self.vll_entry(rule)?.entry("local"))
    }

    fn peer(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        if !self.has_peer {
            return Err(ParseError::MissingContext {
                rule,
                context: "peer",
            });
        }
        Ok(self.vll_entry(rule)?.entry("peer"))
    }
}

fn rules() -> Vec<LineRule<State>> {
    vec![
        LineRule::new("header", &PATTERNS.header, |caps, state: &mut State| {
            let vcid = engine::int_group(caps, "vcid")?;
            let vll_index = engine::int_group(caps, "vll_index")?;
            let name = state.vll.clone();
            let vll = state.out.entry("vll").entry(name);
            vll.insert("vcid", vcid);
            vll.insert("vll_index", vll_index);
            state.has_vll = true;
            Ok(())
        }),
        LineRule::new("end_point", &PATTERNS.end_point, |caps, state: &mut State| {
            let tag_type = engine::str_group(caps, "type").to_string();
            let interface = format!("ethernet {}", engine::str_group(caps, "interface"));
            let vlan_id = match caps.name("vlan_id") {
                Some(m) => Some(engine::int_or_zero(m.as_str(), "vlan_id")?),
                None => None,
            };

            state.has_local = true;
            let local = state.local("end_point")?;
            local.insert("interface", interface);
            if tag_type == "tagged" {
                if let Some(vlan_id) = vlan_id {
                    local.insert("vlan_id", vlan_id);
                }
            }
            local.insert("type", tag_type);
            Ok(())
        }),
        LineRule::new(
            "end_point_state",
            &PATTERNS.end_point_state,
            |caps, state: &mut State| {
                let value = engine::str_group(caps, "state").to_string();
                state.local("end_point_state")?.insert("state", value);
                Ok(())
            },
        ),
        LineRule::new("mct_state", &PATTERNS.mct_state, |caps, state: &mut State| {
            let value = engine::str_group(caps, "mct_state").to_string();
            state.local("mct_state")?.insert("mct_state", value);
            Ok(())
        }),
        LineRule::new("ifl_id", &PATTERNS.ifl_id, |caps, state: &mut State| {
            let value = engine::str_group(caps, "ifl_id").to_string();
            state.local("ifl_id")?.insert("ifl_id", value);
            Ok(())
        }),
        LineRule::new(
            "local_vc_type",
            &PATTERNS.local_vc_type,
            |caps, state: &mut State| {
                let value = engine::str_group(caps, "vc_type").to_string();
                state.local("local_vc_type")?.insert("vc_type", value);
                Ok(())
            },
        ),
        LineRule::new(
            "local_vc_mtu",
            &PATTERNS.local_vc_mtu,
            |caps, state: &mut State| {
                let mtu = engine::int_or_zero(engine::str_group(caps, "mtu"), "mtu")?;
                state.local("local_vc_mtu")?.insert("mtu", mtu);
                Ok(())
            },
        ),
        LineRule::new("cos", &PATTERNS.cos, |caps, state: &mut State| {
            let value = engine::str_group(caps, "cos").to_string();
            state.local("cos")?.insert("cos", value);
            Ok(())
        }),
        LineRule::new(
            "extended_counters",
            &PATTERNS.extended_counters,
            |caps, state: &mut State| {
                let enabled = engine::enabled_flag(engine::str_group(caps, "extended_counters"));
                state
                    .local("extended_counters")?
                    .insert("extended_counters", enabled);
                Ok(())
            },
        ),
        LineRule::new("counter", &PATTERNS.counter, |caps, state: &mut State| {
            let enabled = engine::enabled_flag(engine::str_group(caps, "counter"));
            state.local("counter")?.insert("counters", enabled);
            Ok(())
        }),
        LineRule::new("peer", &PATTERNS.peer, |caps, state: &mut State| {
            let ip = engine::str_group(caps, "ip").to_string();
            state.has_peer = true;
            state.peer("peer")?.insert("ip", ip);
            Ok(())
        }),
        LineRule::new("peer_state", &PATTERNS.peer_state, |caps, state: &mut State| {
            let peer_state = engine::str_group(caps, "state").to_string();
            let reason = caps.name("reason").map(|m| m.as_str().trim().to_string());
            let down = peer_state.eq_ignore_ascii_case("down");

            let peer = state.peer("peer_state")?;
            peer.insert("state", peer_state);
            if down {
                peer.insert("reason", reason.unwrap_or_else(|| "Unknown".to_string()));
            }
            Ok(())
        }),
        LineRule::new("remote_vc", &PATTERNS.remote_vc, |caps, state: &mut State| {
            let vc_type = engine::str_group(caps, "vc_type").to_string();
            let mtu = engine::int_or_zero(engine::str_group(caps, "mtu"), "mtu")?;
            let peer = state.peer("remote_vc")?;
            peer.insert("vc_type", vc_type);
            peer.insert("mtu", mtu);
            Ok(())
        }),
        LineRule::new("labels", &PATTERNS.labels, |caps, state: &mut State| {
            let local = engine::int_or_text(engine::str_group(caps, "local"));
            let remote = engine::int_or_text(engine::str_group(caps, "remote"));
            let peer = state.peer("labels")?;
            peer.insert("local_label", local);
            peer.insert("remote_label", remote);
            Ok(())
        }),
        LineRule::new("group_ids", &PATTERNS.group_ids, |caps, state: &mut State| {
            let local = engine::int_or_text(engine::str_group(caps, "local"));
            let remote = engine::int_or_text(engine::str_group(caps, "remote"));
            let peer = state.peer("group_ids")?;
            peer.insert("local_group_id", local);
            peer.insert("remote_group_id", remote);
            Ok(())
        }),
        LineRule::new("tunnel_lsp", &PATTERNS.tunnel_lsp, |caps, state: &mut State| {
            let name = engine::str_group(caps, "name").to_string();
            let tunnel = engine::str_group(caps, "tunnel").to_string();
            let lsp = state.peer("tunnel_lsp")?.entry("tunnel_lsp");
            lsp.insert("name", name);
            lsp.insert("tunnel_interface", tunnel);
            Ok(())
        }),
        LineRule::new(
            "lsps_assigned",
            &PATTERNS.lsps_assigned,
            |caps, state: &mut State| {
                let value = engine::str_group(caps, "lsps").to_string();
                state.peer("lsps_assigned")?.insert("lsps_assigned", value);
                Ok(())
            },
        ),
    ]
}

/// Parses pre-captured `show mpls vll` output. `vll` is the name the
/// command was scoped to; it becomes the result's table key.
pub fn parse(output: &str, vll: &str) -> Result<Value, ParseError> {
    let mut state = State::new(vll);
    engine::scan_lines(output, &rules(), &mut state)?;
    engine::finish(state.out, schema())
}

/// Executes `show mpls vll {vll}` on `device` and parses its output.
pub fn from_device(device: &mut dyn Device, vll: &str) -> Result<Value, ParseError> {
    let command = CLI_COMMAND.replace("{vll}", vll);
    let output = device.execute(&command)?;
    parse(&output, vll)
}
