//! Parser for `show evpn evi mac` and its variants
//! (`show evpn evi vpn-id {vpn_id} mac`, `show evpn evi mac private`).
//!
//! The summary table has one row per learned MAC:
//!
//! ```text
//! VPN-ID     Encap  MAC address    IP address      Nexthop      Label
//! ---------- ------ -------------- --------------- ------------ -----
//! 65535      N/A    0000.0000.0000 ::              Local        0
//! ```
//!
//! The private variant follows each row with a long `Key : Value` detail
//! block, an `Object:` section with base info, and a MAC event history
//! table. All detail lines attach to the most recently established
//! (vpn-id, mac) entry; event rows are numbered with a counter that runs
//! across the whole parse.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use netshow_core::{Field, Key, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;

pub const CLI_COMMAND: &str = "show evpn evi mac";
pub const CLI_COMMAND_VPN_ID: &str = "show evpn evi vpn-id {vpn_id} mac";
pub const CLI_COMMAND_PRIVATE: &str = "show evpn evi mac private";

struct Patterns {
    // 65535      N/A    0000.0000.0000 ::           Local        0
    summary: Regex,
    // 001b.0100.0001 N/A                            24014    7
    summary_alt: Regex,
    // IP Address   : 7.7.7.8
    ip_address: Regex,
    ethernet_tag: Regex,
    multipaths_resolved: Regex,
    multipaths_internal_label: Regex,
    local_static: Regex,
    remote_static: Regex,
    local_ethernet_segment: Regex,
    ethernet_segment: Regex,
    remote_ethernet_segment: Regex,
    local_sequence_number: Regex,
    remote_sequence_number: Regex,
    local_encapsulation: Regex,
    remote_encapsulation: Regex,
    esi_port_key: Regex,
    source: Regex,
    flush_requested: Regex,
    flush_received: Regex,
    soo_nexthop: Regex,
    bp_xcid: Regex,
    mac_state: Regex,
    mac_producers: Regex,
    local_router_mac: Regex,
    l3_label: Regex,
    // Object: EVPN MAC
    object: Regex,
    // Base info: version=0xdbdb0008, flags=0x4000, type=8, reserved=0
    base_info: Regex,
    // EVPN MAC event history  [Num events: 0]
    event_history: Regex,
    // Jun 14 14:02:12.864 Create    00000000, 00000000 -  -
    event_row: Regex,
    flush_count: Regex,
    bp_ifh: Regex,
    flush_seq_id: Regex,
    static_flag: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| {
    let compile = |pattern: &str| Regex::new(pattern).expect("static regex must compile");
    Patterns {
        summary: compile(
            r"^(?P<vpn_id>\d+) +(?P<encap>\S+) +(?P<mac_address>[\w\.]+) +(?P<ip_address>[\w:\.]+) +(?P<next_hop>[\S ]+) +(?P<label>\d+)$",
        ),
        summary_alt: compile(
            r"^(?P<mac_address>[\w\.]+) +(?P<next_hop>\S+) +(?P<label>\d+) +(?P<vpn_id>\d+)$",
        ),
        ip_address: compile(r"^IP +Address +: +(?P<ip_address>\S+)$"),
        ethernet_tag: compile(r"^Ethernet +Tag +: +(?P<ethernet_tag>\d+)$"),
        multipaths_resolved: compile(r"^Multi-paths +Resolved +: +(?P<multipaths_resolved>\S+)$"),
        multipaths_internal_label: compile(
            r"^Multi-paths +Internal +label +: +(?P<multipaths_internal_label>\d+)$",
        ),
        local_static: compile(r"^Local +Static +: +(?P<local_static>\S+)$"),
        remote_static: compile(r"^Remote +Static +: +(?P<remote_static>\S+)$"),
        local_ethernet_segment: compile(
            r"^Local +Ethernet +Segment +: +(?P<local_ethernet_segment>\S+)$",
        ),
        ethernet_segment: compile(r"^Ether\S+Segment *: +(?P<ethernet_segment>\S+)$"),
        remote_ethernet_segment: compile(
            r"^Remote +Ethernet +Segment +: +(?P<remote_ethernet_segment>\S+)$",
        ),
        local_sequence_number: compile(
            r"^Local +Sequence +Number +: +(?P<local_sequence_number>\d+)$",
        ),
        remote_sequence_number: compile(
            r"^Remote +Sequence +Number +: +(?P<remote_sequence_number>\d+)$",
        ),
        local_encapsulation: compile(r"^Local +Encapsulation +: +(?P<local_encapsulation>\S+)$"),
        remote_encapsulation: compile(r"^Remote +Encapsulation +: +(?P<remote_encapsulation>\S+)$"),
        esi_port_key: compile(r"^ESI +Port +Key +: +(?P<esi_port_key>\d+)$"),
        source: compile(r"^Source +: +(?P<source>\S+)$"),
        flush_requested: compile(r"^Flush +Requested +: +(?P<flush_requested>\d+)$"),
        flush_received: compile(r"^Flush +Received +: +(?P<flush_received>\d+)$"),
        soo_nexthop: compile(r"^SOO +Nexthop +: +(?P<soo_nexthop>\S+)$"),
        bp_xcid: compile(r"^BP +XCID +: +(?P<bp_xcid>\S+)$"),
        mac_state: compile(r"^MAC +State +: +(?P<mac_state>\S+)$"),
        mac_producers: compile(r"^MAC +Producers +: +(?P<mac_producers>[\S ]+)$"),
        local_router_mac: compile(r"^Local +Router +MAC +: +(?P<local_router_mac>\S+)$"),
        l3_label: compile(r"^L3 +Label +: +(?P<l3_label>\d+)$"),
        object: compile(r"^Object: +(?P<object_name>[\S ]+)$"),
        base_info: compile(
            r"^Base info: +version=(?P<version>\S+), +flags=(?P<flags>\S+), +type=(?P<type>\d+), +reserved=(?P<reserved>\d+)$",
        ),
        event_history: compile(r"^EVPN +MAC +event +history +\[Num +events: +(?P<num_events>\d+)\]$"),
        event_row: compile(
            r"^(?P<time>\w+ +\d+ +\S+) +(?P<event>[\S ]+) +(?P<flag_1>\d+), +(?P<flag_2>\d+) +(?P<code_1>\S+) +(?P<code_2>\S+)$",
        ),
        flush_count: compile(r"^Flush +Count *: +(?P<flush_count>\d+)$"),
        bp_ifh: compile(r"^BP +IFH: +(?P<bp_ifh>\d+)$"),
        flush_seq_id: compile(r"^Flush +Seq +ID +: +(?P<flush_seq_id>\d+)$"),
        static_flag: compile(r"^Static: +(?P<static>\S+)$"),
    }
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let event = Schema::mapping(vec![
        Field::required("time", Schema::Str),
        Field::required("event", Schema::Str),
        Field::required("flag_1", Schema::Str),
        Field::required("flag_2", Schema::Str),
        Field::required("code_1", Schema::Str),
        Field::required("code_2", Schema::Str),
    ]);
    let object = Schema::mapping(vec![
        Field::optional(
            "base_info",
            Schema::mapping(vec![
                Field::required("version", Schema::Str),
                Field::required("flags", Schema::Str),
                Field::required("type", Schema::Int),
                Field::required("reserved", Schema::Int),
            ]),
        ),
        Field::optional("num_events", Schema::Int),
        Field::optional(
            "event_history",
            Schema::mapping(vec![Field::any(event)]),
        ),
    ]);
    let mac = Schema::mapping(vec![
        Field::optional("encap", Schema::Str),
        Field::required("ip_address", Schema::Str),
        Field::required("next_hop", Schema::Str),
        Field::required("label", Schema::Int),
        Field::optional("ethernet_tag", Schema::Int),
        Field::optional("multipaths_resolved", Schema::Str),
        Field::optional("multipaths_internal_label", Schema::Int),
        Field::optional("local_static", Schema::Str),
        Field::optional("remote_static", Schema::Str),
        Field::optional("local_ethernet_segment", Schema::Str),
        Field::optional("ethernet_segment", Schema::Str),
        Field::optional("remote_ethernet_segment", Schema::Str),
        Field::optional("local_sequence_number", Schema::Int),
        Field::optional("remote_sequence_number", Schema::Int),
        Field::optional("local_encapsulation", Schema::Str),
        Field::optional("remote_encapsulation", Schema::Str),
        Field::optional("esi_port_key", Schema::Int),
        Field::optional("source", Schema::Str),
        Field::optional("flush_requested", Schema::Int),
        Field::optional("flush_received", Schema::Int),
        Field::optional("flush_count", Schema::Int),
        Field::optional("flush_seq_id", Schema::Int),
        Field::optional("static", Schema::Str),
        Field::optional("soo_nexthop", Schema::Str),
        Field::optional("bp_xcid", Schema::Str),
        Field::optional("bp_ifh", Schema::Str),
        Field::optional("mac_state", Schema::Str),
        Field::optional("mac_producers", Schema::Str),
        Field::optional("local_router_mac", Schema::Str),
        Field::optional("l3_label", Schema::Int),
        Field::optional("object", Schema::mapping(vec![Field::any(object)])),
    ]);
    Schema::mapping(vec![Field::required(
        "vpn_id",
        Schema::mapping(vec![Field::any(Schema::mapping(vec![Field::required(
            "mac_address",
            Schema::mapping(vec![Field::any(mac)]),
        )]))]),
    )])
});

/// Declared shape of [`parse`]'s result.
pub fn schema() -> &'static Schema {
    &SCHEMA
}

#[derive(Default)]
struct State {
    out: Value,
    cursor: Option<(i64, String)>,
    object: Option<String>,
    event_index: i64,
}

impl State {
    fn establish(&mut self, vpn_id: i64, mac_address: &str) -> &mut Value {
        self.cursor = Some((vpn_id, mac_address.to_string()));
        self.object = None;
        self.out
            .entry("vpn_id")
            .entry(Key::Int(vpn_id))
            .entry("mac_address")
            .entry(mac_address)
    }

    fn mac(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        let (vpn_id, mac_address) = self
            .cursor
            .clone()
            .ok_or(ParseError::MissingContext {
                rule,
                context: "mac_address",
            })?;
        Ok(self
            .out
            .entry("vpn_id")
            .entry(Key::Int(vpn_id))
            .entry("mac_address")
            .entry(mac_address))
    }

    fn object(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        let name = self
            .object
            .as_deref()
            .ok_or(ParseError::MissingContext {
                rule,
                context: "object",
            })?
            .to_string();
        Ok(self.mac(rule)?.entry("object").entry(name))
    }
}

/// How a detail rule coerces its single captured field.
#[derive(Clone, Copy)]
enum Coerce {
    Str,
    Int,
}

impl Coerce {
    fn apply(self, caps: &Captures<'_>, name: &'static str) -> Result<Value, ParseError> {
        Ok(match self {
            Coerce::Str => Value::from(engine::str_group(caps, name)),
            Coerce::Int => Value::Int(engine::int_group(caps, name)?),
        })
    }
}

/// Builds a rule attaching one `Key : Value` field to the current entry.
fn detail_rule(
    name: &'static str,
    pattern: &'static Regex,
    coerce: Coerce,
) -> LineRule<State> {
    LineRule::new(name, pattern, move |caps, state: &mut State| {
        let value = coerce.apply(caps, name)?;
        state.mac(name)?.insert(name, value);
        Ok(())
    })
}

fn rules() -> Vec<LineRule<State>> {
    vec![
        LineRule::new("summary", &PATTERNS.summary, |caps, state: &mut State| {
            let vpn_id = engine::int_group(caps, "vpn_id")?;
            let label = engine::int_group(caps, "label")?;
            let encap = engine::str_group(caps, "encap").to_string();
            let ip_address = engine::str_group(caps, "ip_address").to_string();
            let next_hop = engine::str_group(caps, "next_hop").to_string();
            let mac_address = engine::str_group(caps, "mac_address").to_string();

            let entry = state.establish(vpn_id, &mac_address);
            entry.insert("encap", encap);
            entry.insert("ip_address", ip_address);
            entry.insert("next_hop", next_hop);
            entry.insert("label", label);
            Ok(())
        }),
        LineRule::new(
            "summary_alt",
            &PATTERNS.summary_alt,
            |caps, state: &mut State| {
                let vpn_id = engine::int_group(caps, "vpn_id")?;
                let label = engine::int_group(caps, "label")?;
                let next_hop = engine::str_group(caps, "next_hop").to_string();
                let mac_address = engine::str_group(caps, "mac_address").to_string();

                let entry = state.establish(vpn_id, &mac_address);
                entry.insert("next_hop", next_hop);
                entry.insert("label", label);
                Ok(())
            },
        ),
        detail_rule("ip_address", &PATTERNS.ip_address, Coerce::Str),
        detail_rule("ethernet_tag", &PATTERNS.ethernet_tag, Coerce::Int),
        detail_rule(
            "multipaths_resolved",
            &PATTERNS.multipaths_resolved,
            Coerce::Str,
        ),
        detail_rule(
            "multipaths_internal_label",
            &PATTERNS.multipaths_internal_label,
            Coerce::Int,
        ),
        detail_rule("local_static", &PATTERNS.local_static, Coerce::Str),
        detail_rule("remote_static", &PATTERNS.remote_static, Coerce::Str),
        detail_rule(
            "local_ethernet_segment",
            &PATTERNS.local_ethernet_segment,
            Coerce::Str,
        ),
        detail_rule("ethernet_segment", &PATTERNS.ethernet_segment, Coerce::Str),
        detail_rule(
            "remote_ethernet_segment",
            &PATTERNS.remote_ethernet_segment,
            Coerce::Str,
        ),
        detail_rule(
            "local_sequence_number",
            &PATTERNS.local_sequence_number,
            Coerce::Int,
        ),
        detail_rule(
            "remote_sequence_number",
            &PATTERNS.remote_sequence_number,
            Coerce::Int,
        ),
        detail_rule(
            "local_encapsulation",
            &PATTERNS.local_encapsulation,
            Coerce::Str,
        ),
        detail_rule(
            "remote_encapsulation",
            &PATTERNS.remote_encapsulation,
            Coerce::Str,
        ),
        detail_rule("esi_port_key", &PATTERNS.esi_port_key, Coerce::Int),
        detail_rule("source", &PATTERNS.source, Coerce::Str),
        detail_rule("flush_requested", &PATTERNS.flush_requested, Coerce::Int),
        detail_rule("flush_received", &PATTERNS.flush_received, Coerce::Int),
        detail_rule("soo_nexthop", &PATTERNS.soo_nexthop, Coerce::Str),
        detail_rule("bp_xcid", &PATTERNS.bp_xcid, Coerce::Str),
        detail_rule("mac_state", &PATTERNS.mac_state, Coerce::Str),
        detail_rule("mac_producers", &PATTERNS.mac_producers, Coerce::Str),
        detail_rule("local_router_mac", &PATTERNS.local_router_mac, Coerce::Str),
        detail_rule("l3_label", &PATTERNS.l3_label, Coerce::Int),
        LineRule::new("object", &PATTERNS.object, |caps, state: &mut State| {
            let name = engine::str_group(caps, "object_name").to_string();
            state.mac("object")?.entry("object").entry(name.clone());
            state.object = Some(name);
            Ok(())
        }),
        LineRule::new("base_info", &PATTERNS.base_info, |caps, state: &mut State| {
            let version = engine::str_group(caps, "version").to_string();
            let flags = engine::str_group(caps, "flags").to_string();
            let info_type = engine::int_group(caps, "type")?;
            let reserved = engine::int_group(caps, "reserved")?;

            let base_info = state.object("base_info")?.entry("base_info");
            base_info.insert("version", version);
            base_info.insert("flags", flags);
            base_info.insert("type", info_type);
            base_info.insert("reserved", reserved);
            Ok(())
        }),
        LineRule::new(
            "event_history",
            &PATTERNS.event_history,
            |caps, state: &mut State| {
                let num_events = engine::int_group(caps, "num_events")?;
                state
                    .object("event_history")?
                    .insert("num_events", num_events);
                Ok(())
            },
        ),
        LineRule::new("event_row", &PATTERNS.event_row, |caps, state: &mut State| {
            let time = engine::str_group(caps, "time").to_string();
            let event = engine::str_group(caps, "event").to_string();
            let flag_1 = engine::str_group(caps, "flag_1").to_string();
            let flag_2 = engine::str_group(caps, "flag_2").to_string();
            let code_1 = engine::str_group(caps, "code_1").to_string();
            let code_2 = engine::str_group(caps, "code_2").to_string();

            state.event_index += 1;
            let index = state.event_index;
            let entry = state
                .object("event_row")?
                .entry("event_history")
                .entry(Key::Int(index));
            entry.insert("time", time);
            entry.insert("event", event);
            entry.insert("flag_1", flag_1);
            entry.insert("flag_2", flag_2);
            entry.insert("code_1", code_1);
            entry.insert("code_2", code_2);
            Ok(())
        }),
        detail_rule("flush_count", &PATTERNS.flush_count, Coerce::Int),
        detail_rule("bp_ifh", &PATTERNS.bp_ifh, Coerce::Str),
        detail_rule("flush_seq_id", &PATTERNS.flush_seq_id, Coerce::Int),
        LineRule::new("static", &PATTERNS.static_flag, |caps, state: &mut State| {
            let value = engine::str_group(caps, "static").to_string();
            state.mac("static")?.insert("static", value);
            Ok(())
        }),
    ]
}

/// Parses pre-captured `show evpn evi mac` output (any variant).
pub fn parse(output: &str) -> Result<Value, ParseError> {
    let mut state = State::default();
    engine::scan_lines(output, &rules(), &mut state)?;
    engine::finish(state.out, schema())
}

/// Executes the command on `device`, scoped to `vpn_id` when given, and
/// parses its output.
pub fn from_device(device: &mut dyn Device, vpn_id: Option<i64>) -> Result<Value, ParseError> {
    let command = match vpn_id {
        Some(vpn_id) => CLI_COMMAND_VPN_ID.replace("{vpn_id}", &vpn_id.to_string()),
        None => CLI_COMMAND.to_string(),
    };
    let output = device.execute(&command)?;
    parse(&output)
}

/// Executes `show evpn evi mac private` on `device` and parses its output.
pub fn from_device_private(device: &mut dyn Device) -> Result<Value, ParseError> {
    let output = device.execute(CLI_COMMAND_PRIVATE)?;
    parse(&output)
}
