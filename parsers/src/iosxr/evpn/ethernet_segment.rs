//! Parser for `show evpn ethernet-segment` and its variants (`detail`,
//! `private`, `esi {esi} detail`).
//!
//! The summary table has one row per segment, with extra next-hop
//! addresses continued on their own lines:
//!
//! ```text
//! Ethernet Segment Id      Interface      Nexthops
//! ------------------------ -------------- ----------------------------------------
//! 0210.0300.9e00.0210.0000 Gi0/3/0/0      1.100.100.100
//!                                         2.100.100.100
//! ```
//!
//! Detail variants follow each row with attribute blocks (main port, ESI,
//! topology, service-carving results, SHG labels). Table rows abbreviate
//! the interface name while detail blocks spell it out, so row interfaces
//! are canonicalized before keying.
//!
//! Rule order matters here: the attribute rules are tried first because a
//! bare `Key : Value` line such as `Forwarders : 1` would otherwise
//! satisfy the three-column row pattern.

use std::sync::LazyLock;

use regex::Regex;

use netshow_core::{Field, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;
use crate::intf::canonical_interface_name;

pub const CLI_COMMAND: &str = "show evpn ethernet-segment";
pub const CLI_COMMAND_DETAIL: &str = "show evpn ethernet-segment detail";
pub const CLI_COMMAND_PRIVATE: &str = "show evpn ethernet-segment private";
pub const CLI_COMMAND_ESI_DETAIL: &str = "show evpn ethernet-segment esi {esi} detail";

struct Patterns {
    // 0210.0300.9e00.0210.0000 Gi0/3/0/0      1.100.100.100
    row: Regex,
    // 2.100.100.100
    next_hop: Regex,
    es_to_bgp_gates: Regex,
    es_to_l2fib_gates: Regex,
    // Interface name : GigabitEthernet0/3/0/0
    main_port_interface: Regex,
    main_port_interface_mac: Regex,
    main_port_if_handle: Regex,
    main_port_state: Regex,
    main_port_redundancy: Regex,
    source_mac: Regex,
    // Operational    : MH, All-active
    topology_operational: Regex,
    topology_configured: Regex,
    primary_services: Regex,
    secondary_services: Regex,
    // Bridge ports   : 3
    bridge_ports: Regex,
    elected: Regex,
    not_elected: Regex,
    // I-Sid E  :  1450101, 1650205, 1850309
    i_sid_e: Regex,
    i_sid_ne: Regex,
    mac_flushing_mode: Regex,
    peering_timer: Regex,
    recovery_timer: Regex,
    flush_again_timer: Regex,
    // ESI type          : 0
    esi_type: Regex,
    esi_value: Regex,
    es_import_rt: Regex,
    service_carving: Regex,
    // Peering Details   : 3.3.3.36[MOD:P:00] 3.3.3.37[MOD:P:00]
    peering_details: Regex,
    forwarders: Regex,
    permanent: Regex,
    carving_timer: Regex,
    local_shg_label: Regex,
    // Remote SHG labels : 1
    remote_shg_labels: Regex,
    // 64005 : nexthop 3.3.3.37
    shg_label: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| {
    let compile = |pattern: &str| Regex::new(pattern).expect("static regex must compile");
    Patterns {
        row: compile(r"^(?P<segment_id>\S+) +(?P<interface>\S+) +(?P<next_hop>[\d\.]+)$"),
        next_hop: compile(r"^(?P<next_hop>[\d\.]+)$"),
        es_to_bgp_gates: compile(r"^ES +to +BGP +Gates +: +(?P<es_to_bgp_gates>\S+)$"),
        es_to_l2fib_gates: compile(r"^ES +to +L2FIB +Gates +: +(?P<es_to_l2fib_gates>\S+)$"),
        main_port_interface: compile(r"^Interface name +: +(?P<interface>\S+)$"),
        main_port_interface_mac: compile(r"^Interface +MAC *: +(?P<interface_mac>[\S ]+)$"),
        main_port_if_handle: compile(r"^IfHandle +: +(?P<if_handle>\S+)$"),
        main_port_state: compile(r"^State +: +(?P<state>\S+)$"),
        main_port_redundancy: compile(r"^Redundancy +: +(?P<redundancy>[\S ]+)$"),
        source_mac: compile(r"^Source +MAC +: +(?P<source_mac>[\S ]+)$"),
        topology_operational: compile(r"^Operational +: +(?P<operational>[\S ]+)$"),
        topology_configured: compile(r"^Configured +: +(?P<configured>[\S ]+)$"),
        primary_services: compile(r"^Primary +Services +: +(?P<primary_services>\S+)$"),
        secondary_services: compile(r"^Secondary +Services *: +(?P<secondary_services>\S+)$"),
        bridge_ports: compile(r"^Bridge +ports +: +(?P<bridge_ports>\d+)$"),
        elected: compile(r"^Elected +: +(?P<elected>\d+)$"),
        not_elected: compile(r"^Not +Elected +: +(?P<not_elected>\d+)$"),
        i_sid_e: compile(r"^I-Sid +E +: +(?P<i_sid_e>[\S ]+)$"),
        i_sid_ne: compile(r"^I-Sid +NE +: +(?P<i_sid_ne>[\S ]+)$"),
        mac_flushing_mode: compile(r"^MAC +Flushing +mode +: +(?P<mac_flushing_mode>\S+)$"),
        peering_timer: compile(r"^Peering +timer +: +(?P<peering_timer>[\S ]+)$"),
        recovery_timer: compile(r"^Recovery +timer +: +(?P<recovery_timer>[\S ]+)$"),
        flush_again_timer: compile(r"^Flushagain +timer +: +(?P<flush_again_timer>[\S ]+)$"),
        esi_type: compile(r"^ESI +type *: +(?P<esi_type>\d+)$"),
        esi_value: compile(r"^Value *: +(?P<value>[\S ]+)$"),
        es_import_rt: compile(r"^ES +Import +RT *: +(?P<es_import_rt>[\S ]+)$"),
        service_carving: compile(r"^Service +Carving *: +(?P<service_carving>[\S ]+)$"),
        peering_details: compile(r"^Peering +Details *: +(?P<peering_details>[\S ]+)$"),
        forwarders: compile(r"^Forwarders *: +(?P<forwarders>\d+)$"),
        permanent: compile(r"^Permanent *: +(?P<permanent>\d+)$"),
        carving_timer: compile(r"^Carving +timer *: +(?P<carving_timer>[\S ]+)$"),
        local_shg_label: compile(r"^Local +SHG +label *: +(?P<local_shg_label>\S+)$"),
        remote_shg_labels: compile(r"^Remote +SHG +labels? *: +(?P<remote_shg_labels>\d+)$"),
        shg_label: compile(r"^(?P<shg_label>\d+) *: +nexthop +(?P<next_hop>\S+)$"),
    }
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let main_port = Schema::mapping(vec![
        Field::required("interface", Schema::Str),
        Field::optional("interface_mac", Schema::Str),
        Field::required("if_handle", Schema::Str),
        Field::required("state", Schema::Str),
        Field::required("redundancy", Schema::Str),
    ]);
    let service_carving_results = Schema::mapping(vec![
        Field::optional("forwarders", Schema::Int),
        Field::optional("permanent", Schema::Int),
        Field::optional(
            "bridge_ports",
            Schema::mapping(vec![Field::required("num_of_total", Schema::Int)]),
        ),
        Field::required(
            "elected",
            Schema::mapping(vec![
                Field::required("num_of_total", Schema::Int),
                Field::optional("i_sid_e", Schema::seq(Schema::Str)),
            ]),
        ),
        Field::required(
            "not_elected",
            Schema::mapping(vec![
                Field::required("num_of_total", Schema::Int),
                Field::optional("i_sid_ne", Schema::seq(Schema::Str)),
            ]),
        ),
    ]);
    let interface = Schema::mapping(vec![
        Field::required("next_hops", Schema::seq(Schema::Str)),
        Field::optional("es_to_bgp_gates", Schema::Str),
        Field::optional("es_to_l2fib_gates", Schema::Str),
        Field::optional("main_port", main_port),
        Field::optional(
            "esi",
            Schema::mapping(vec![
                Field::required("type", Schema::Int),
                Field::required("value", Schema::Str),
            ]),
        ),
        Field::optional("es_import_rt", Schema::Str),
        Field::optional("source_mac", Schema::Str),
        Field::optional(
            "topology",
            Schema::mapping(vec![
                Field::required("operational", Schema::Str),
                Field::required("configured", Schema::Str),
            ]),
        ),
        Field::optional("primary_services", Schema::Str),
        Field::optional("secondary_services", Schema::Str),
        Field::optional("service_carving", Schema::Str),
        Field::optional("peering_details", Schema::seq(Schema::Str)),
        Field::optional("service_carving_results", service_carving_results),
        Field::optional("mac_flushing_mode", Schema::Str),
        Field::optional("peering_timer", Schema::Str),
        Field::optional("recovery_timer", Schema::Str),
        Field::optional("carving_timer", Schema::Str),
        Field::optional("local_shg_label", Schema::Str),
        Field::optional(
            "remote_shg_labels",
            Schema::mapping(vec![Field::any(Schema::mapping(vec![Field::optional(
                "label",
                Schema::mapping(vec![Field::any(Schema::mapping(vec![Field::required(
                    "nexthop",
                    Schema::Str,
                )]))]),
            )]))]),
        ),
        Field::optional("flush_again_timer", Schema::Str),
    ]);
    Schema::mapping(vec![Field::required(
        "segment_id",
        Schema::mapping(vec![Field::any(Schema::mapping(vec![Field::required(
            "interface",
            Schema::mapping(vec![Field::any(interface)]),
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
    cursor: Option<(String, String)>,
    has_esi: bool,
    has_elected: bool,
    has_not_elected: bool,
    remote_shg: Option<String>,
}

impl State {
    fn establish(&mut self, segment_id: &str, interface: &str) -> &mut Value {
        self.cursor = Some((segment_id.to_string(), interface.to_string()));
        self.has_esi = false;
        self.has_elected = false;
        self.has_not_elected = false;
        self.remote_shg = None;
        self.navigate()
    }

    fn navigate(&mut self) -> &mut Value {
        let (segment_id, interface) = self
            .cursor
            .clone()
            .unwrap_or_else(|| unreachable!("navigate called without cursor"));
        self.out
            .entry("segment_id")
            .entry(segment_id)
            .entry("interface")
            .entry(interface)
    }

    fn interface(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        if self.cursor.is_none() {
            return Err(ParseError::MissingContext {
                rule,
                context: "interface",
            });
        }
        Ok(self.navigate())
    }
}

/// Builds a rule attaching one string attribute to the current interface.
fn intf_rule(name: &'static str, pattern: &'static Regex) -> LineRule<State> {
    LineRule::new(name, pattern, move |caps, state: &mut State| {
        let value = engine::str_group(caps, name).to_string();
        state.interface(name)?.insert(name, value);
        Ok(())
    })
}

/// Builds a rule attaching one string attribute to the current main port.
fn main_port_rule(name: &'static str, pattern: &'static Regex) -> LineRule<State> {
    LineRule::new(name, pattern, move |caps, state: &mut State| {
        let value = engine::str_group(caps, name).to_string();
        state.interface(name)?.entry("main_port").insert(name, value);
        Ok(())
    })
}

/// Builds a rule attaching one side of the topology block.
fn topology_rule(name: &'static str, pattern: &'static Regex) -> LineRule<State> {
    LineRule::new(name, pattern, move |caps, state: &mut State| {
        let value = engine::str_group(caps, name).to_string();
        state.interface(name)?.entry("topology").insert(name, value);
        Ok(())
    })
}

/// Builds a rule attaching one counter to the service-carving results.
fn carving_count_rule(name: &'static str, pattern: &'static Regex) -> LineRule<State> {
    LineRule::new(name, pattern, move |caps, state: &mut State| {
        let value = engine::int_group(caps, name)?;
        state
            .interface(name)?
            .entry("service_carving_results")
            .insert(name, value);
        Ok(())
    })
}

fn rules() -> Vec<LineRule<State>> {
    vec![
        intf_rule("es_to_bgp_gates", &PATTERNS.es_to_bgp_gates),
        intf_rule("es_to_l2fib_gates", &PATTERNS.es_to_l2fib_gates),
        LineRule::new(
            "main_port_interface",
            &PATTERNS.main_port_interface,
            |caps, state: &mut State| {
                let value = engine::str_group(caps, "interface").to_string();
                state
                    .interface("main_port_interface")?
                    .entry("main_port")
                    .insert("interface", value);
                Ok(())
            },
        ),
        main_port_rule("interface_mac", &PATTERNS.main_port_interface_mac),
        main_port_rule("if_handle", &PATTERNS.main_port_if_handle),
        main_port_rule("state", &PATTERNS.main_port_state),
        main_port_rule("redundancy", &PATTERNS.main_port_redundancy),
        intf_rule("source_mac", &PATTERNS.source_mac),
        topology_rule("operational", &PATTERNS.topology_operational),
        topology_rule("configured", &PATTERNS.topology_configured),
        intf_rule("primary_services", &PATTERNS.primary_services),
        intf_rule("secondary_services", &PATTERNS.secondary_services),
        LineRule::new("bridge_ports", &PATTERNS.bridge_ports, |caps, state: &mut State| {
            let total = engine::int_group(caps, "bridge_ports")?;
            state
                .interface("bridge_ports")?
                .entry("service_carving_results")
                .entry("bridge_ports")
                .insert("num_of_total", total);
            Ok(())
        }),
        LineRule::new("elected", &PATTERNS.elected, |caps, state: &mut State| {
            let total = engine::int_group(caps, "elected")?;
            state
                .interface("elected")?
                .entry("service_carving_results")
                .entry("elected")
                .insert("num_of_total", total);
            state.has_elected = true;
            Ok(())
        }),
        LineRule::new("not_elected", &PATTERNS.not_elected, |caps, state: &mut State| {
            let total = engine::int_group(caps, "not_elected")?;
            state
                .interface("not_elected")?
                .entry("service_carving_results")
                .entry("not_elected")
                .insert("num_of_total", total);
            state.has_not_elected = true;
            Ok(())
        }),
        LineRule::new("i_sid_e", &PATTERNS.i_sid_e, |caps, state: &mut State| {
            if !state.has_elected {
                return Err(ParseError::MissingContext {
                    rule: "i_sid_e",
                    context: "elected",
                });
            }
            let sids = engine::split_comma_list(engine::str_group(caps, "i_sid_e"));
            state
                .interface("i_sid_e")?
                .entry("service_carving_results")
                .entry("elected")
                .insert("i_sid_e", sids);
            Ok(())
        }),
        LineRule::new("i_sid_ne", &PATTERNS.i_sid_ne, |caps, state: &mut State| {
            if !state.has_not_elected {
                return Err(ParseError::MissingContext {
                    rule: "i_sid_ne",
                    context: "not_elected",
                });
            }
            let sids = engine::split_comma_list(engine::str_group(caps, "i_sid_ne"));
            state
                .interface("i_sid_ne")?
                .entry("service_carving_results")
                .entry("not_elected")
                .insert("i_sid_ne", sids);
            Ok(())
        }),
        intf_rule("mac_flushing_mode", &PATTERNS.mac_flushing_mode),
        intf_rule("peering_timer", &PATTERNS.peering_timer),
        intf_rule("recovery_timer", &PATTERNS.recovery_timer),
        intf_rule("flush_again_timer", &PATTERNS.flush_again_timer),
        LineRule::new("esi_type", &PATTERNS.esi_type, |caps, state: &mut State| {
            let esi_type = engine::int_group(caps, "esi_type")?;
            state
                .interface("esi_type")?
                .entry("esi")
                .insert("type", esi_type);
            state.has_esi = true;
            Ok(())
        }),
        LineRule::new("esi_value", &PATTERNS.esi_value, |caps, state: &mut State| {
            if !state.has_esi {
                return Err(ParseError::MissingContext {
                    rule: "esi_value",
                    context: "esi_type",
                });
            }
            let value = engine::str_group(caps, "value").to_string();
            state
                .interface("esi_value")?
                .entry("esi")
                .insert("value", value);
            Ok(())
        }),
        intf_rule("es_import_rt", &PATTERNS.es_import_rt),
        intf_rule("service_carving", &PATTERNS.service_carving),
        LineRule::new(
            "peering_details",
            &PATTERNS.peering_details,
            |caps, state: &mut State| {
                let peers = engine::split_space_list(engine::str_group(caps, "peering_details"));
                state
                    .interface("peering_details")?
                    .insert("peering_details", peers);
                Ok(())
            },
        ),
        carving_count_rule("forwarders", &PATTERNS.forwarders),
        carving_count_rule("permanent", &PATTERNS.permanent),
        intf_rule("carving_timer", &PATTERNS.carving_timer),
        intf_rule("local_shg_label", &PATTERNS.local_shg_label),
        LineRule::new(
            "remote_shg_labels",
            &PATTERNS.remote_shg_labels,
            |caps, state: &mut State| {
                let count = engine::str_group(caps, "remote_shg_labels").to_string();
                state
                    .interface("remote_shg_labels")?
                    .entry("remote_shg_labels")
                    .entry(count.clone());
                state.remote_shg = Some(count);
                Ok(())
            },
        ),
        LineRule::new("shg_label", &PATTERNS.shg_label, |caps, state: &mut State| {
            let count = state
                .remote_shg
                .clone()
                .ok_or(ParseError::MissingContext {
                    rule: "shg_label",
                    context: "remote_shg_labels",
                })?;
            let label = engine::str_group(caps, "shg_label").to_string();
            let next_hop = engine::str_group(caps, "next_hop").to_string();
            state
                .interface("shg_label")?
                .entry("remote_shg_labels")
                .entry(count)
                .entry("label")
                .entry(label)
                .insert("nexthop", next_hop);
            Ok(())
        }),
        LineRule::new("row", &PATTERNS.row, |caps, state: &mut State| {
            let segment_id = engine::str_group(caps, "segment_id").to_string();
            let interface = canonical_interface_name(engine::str_group(caps, "interface"));
            let next_hop = engine::str_group(caps, "next_hop").to_string();

            let entry = state.establish(&segment_id, &interface);
            if entry.get("next_hops").is_none() {
                entry.insert("next_hops", Value::List(vec![Value::from(next_hop)]));
            }
            Ok(())
        }),
        LineRule::new("next_hop", &PATTERNS.next_hop, |caps, state: &mut State| {
            let next_hop = engine::str_group(caps, "next_hop").to_string();
            state
                .interface("next_hop")?
                .or_insert("next_hops", Value::list())
                .push(next_hop);
            Ok(())
        }),
    ]
}

/// Parses pre-captured `show evpn ethernet-segment` output (any variant).
pub fn parse(output: &str) -> Result<Value, ParseError> {
    let mut state = State::default();
    engine::scan_lines(output, &rules(), &mut state)?;
    engine::finish(state.out, schema())
}

/// Executes the command on `device` and parses its output.
pub fn from_device(device: &mut dyn Device, detail: bool) -> Result<Value, ParseError> {
    let command = if detail { CLI_COMMAND_DETAIL } else { CLI_COMMAND };
    let output = device.execute(command)?;
    parse(&output)
}

/// Executes `show evpn ethernet-segment esi {esi} detail` on `device` and
/// parses its output.
pub fn from_device_esi(device: &mut dyn Device, esi: &str) -> Result<Value, ParseError> {
    let command = CLI_COMMAND_ESI_DETAIL.replace("{esi}", esi);
    let output = device.execute(&command)?;
    parse(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_with_next_hop_continuation() {
        let output = "\
Ethernet Segment Id      Interface      Nexthops
------------------------ -------------- ----------------------------------------
0210.0300.9e00.0210.0000 Gi0/3/0/0      1.100.100.100
                                        2.100.100.100
be01.0300.9e00.0210.0000 BE100          3.100.100.100
";
        let parsed = parse(output).expect("table should parse");
        let segments = parsed.get("segment_id").expect("segment root");

        // Table rows abbreviate; keys are canonical.
        let first = segments
            .get("0210.0300.9e00.0210.0000")
            .and_then(|s| s.get("interface"))
            .and_then(|i| i.get("GigabitEthernet0/3/0/0"))
            .expect("canonical interface key");
        let hops = first.get("next_hops").and_then(Value::as_list).unwrap();
        assert_eq!(
            hops,
            &[Value::from("1.100.100.100"), Value::from("2.100.100.100")]
        );

        let second = segments
            .get("be01.0300.9e00.0210.0000")
            .and_then(|s| s.get("interface"))
            .and_then(|i| i.get("Bundle-Ether100"))
            .expect("bundle interface expanded");
        assert_eq!(
            second.get("next_hops").and_then(Value::as_list).map(|h| h.len()),
            Some(1)
        );
    }

    #[test]
    fn test_detail_blocks() {
        let output = "\
0036.3700.0000.0000.1100 Gi0/3/0/0      3.3.3.36
ES to BGP Gates   : Ready
ES to L2FIB Gates : Ready
Main port         :
   Interface name : GigabitEthernet0/3/0/0
   Interface MAC  : 008a.9644.d8dd
   IfHandle       : 0x1800300
   State          : Up
   Redundancy     : Not Defined
ESI type          : 0
   Value          : 36.3700.0000.0000.1100
ES Import RT      : 3637.0000.0000 (from ESI)
Source MAC        : 0001.ed9e.0001 (PBB BSA)
Topology          :
   Operational    : MH, All-active
   Configured     : All-active (AApF) (default)
Service Carving   : Auto-selection
Peering Details   : 3.3.3.36[MOD:P:00] 3.3.3.37[MOD:P:00]
Service Carving Results:
   Forwarders     : 1
   Permanent      : 0
   Elected        : 0
   Not Elected    : 3
      I-Sid NE  :  1450101, 1650205, 1850309
MAC Flushing mode : STP-TCN
Peering timer     : 45 sec [not running]
Recovery timer    : 20 sec [not running]
Carving timer     : 0 sec [not running]
Local SHG label   : 64005
Remote SHG labels : 1
            64005 : nexthop 3.3.3.37
";
        let parsed = parse(output).unwrap();
        let intf = parsed
            .get("segment_id")
            .and_then(|s| s.get("0036.3700.0000.0000.1100"))
            .and_then(|s| s.get("interface"))
            .and_then(|i| i.get("GigabitEthernet0/3/0/0"))
            .expect("interface entry");

        assert_eq!(
            intf.get("es_to_bgp_gates").and_then(Value::as_str),
            Some("Ready")
        );

        let main_port = intf.get("main_port").expect("main port block");
        assert_eq!(
            main_port.get("interface").and_then(Value::as_str),
            Some("GigabitEthernet0/3/0/0")
        );
        assert_eq!(
            main_port.get("if_handle").and_then(Value::as_str),
            Some("0x1800300")
        );
        assert_eq!(main_port.get("state").and_then(Value::as_str), Some("Up"));
        assert_eq!(
            main_port.get("redundancy").and_then(Value::as_str),
            Some("Not Defined")
        );

        let esi = intf.get("esi").expect("esi block");
        assert_eq!(esi.get("type").and_then(Value::as_int), Some(0));
        assert_eq!(
            esi.get("value").and_then(Value::as_str),
            Some("36.3700.0000.0000.1100")
        );

        let topology = intf.get("topology").expect("topology block");
        assert_eq!(
            topology.get("operational").and_then(Value::as_str),
            Some("MH, All-active")
        );

        assert_eq!(
            intf.get("peering_details").and_then(Value::as_list),
            Some(
                &[
                    Value::from("3.3.3.36[MOD:P:00]"),
                    Value::from("3.3.3.37[MOD:P:00]"),
                ][..]
            )
        );

        let carving = intf.get("service_carving_results").expect("carving block");
        assert_eq!(carving.get("forwarders").and_then(Value::as_int), Some(1));
        assert_eq!(carving.get("permanent").and_then(Value::as_int), Some(0));
        assert_eq!(
            carving
                .get("elected")
                .and_then(|e| e.get("num_of_total"))
                .and_then(Value::as_int),
            Some(0)
        );
        let not_elected = carving.get("not_elected").expect("not elected");
        assert_eq!(
            not_elected.get("num_of_total").and_then(Value::as_int),
            Some(3)
        );
        assert_eq!(
            not_elected.get("i_sid_ne").and_then(Value::as_list),
            Some(
                &[
                    Value::from("1450101"),
                    Value::from("1650205"),
                    Value::from("1850309"),
                ][..]
            )
        );

        assert_eq!(
            intf.get("local_shg_label").and_then(Value::as_str),
            Some("64005")
        );
        let shg = intf
            .get("remote_shg_labels")
            .and_then(|r| r.get("1"))
            .and_then(|r| r.get("label"))
            .and_then(|l| l.get("64005"))
            .expect("remote shg label entry");
        assert_eq!(shg.get("nexthop").and_then(Value::as_str), Some("3.3.3.37"));
    }

    #[test]
    fn test_continuation_before_any_row_is_missing_context() {
        assert_eq!(
            parse("2.100.100.100\n"),
            Err(ParseError::MissingContext {
                rule: "next_hop",
                context: "interface",
            })
        );
    }

    #[test]
    fn test_empty_output_is_empty_result() {
        assert_eq!(parse(""), Err(ParseError::EmptyResult));
    }
}
