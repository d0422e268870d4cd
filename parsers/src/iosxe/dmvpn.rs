//! Parser for `show dmvpn` / `show dmvpn interface {interface}`.
//!
//! Output is a sequence of per-tunnel sections: an interface header, a
//! one-line summary, then a peer table. Peers are bucketed by the literal
//! address family of their NBMA address, so a dual-stack hub yields both
//! `ipv4` and `ipv6` buckets under the same tunnel.
//!
//! ```text
//! Interface: Tunnel84, IPv4 NHRP Details
//! Type:Spoke, NHRP Peers:1,
//!
//!  # Ent  Peer NBMA Addr Peer Tunnel Add State  UpDn Tm Attrb
//!  ----- --------------- --------------- ----- -------- -----
//!      1 172.29.0.1          172.30.90.1   UP    6d12h     S
//! ```

use std::sync::LazyLock;

use regex::Regex;

use netshow_core::{Field, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;

/// Command issued when no interface is given.
pub const CLI_COMMAND: &str = "show dmvpn";
/// Command template for a single tunnel interface.
pub const CLI_COMMAND_INTERFACE: &str = "show dmvpn interface {interface}";

struct Patterns {
    // Interface: Tunnel84, IPv4 NHRP Details
    interface: Regex,
    // Type:Spoke, NHRP Peers:1,
    summary: Regex,
    //     1 172.29.0.1          172.30.90.1   UP    6d12h     S
    peer: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    interface: Regex::new(r"^Interface: +(?P<interface>\S+),").expect("static regex must compile"),
    summary: Regex::new(r"^Type:(?P<type>\S+), +NHRP Peers:(?P<total_peers>\d+),$")
        .expect("static regex must compile"),
    peer: Regex::new(
        r"^(?P<ent>\d+) +(?P<nbma_addr>[a-z0-9.:]+) +(?P<tunnel_addr>[a-z0-9.:]+) +(?P<state>[a-zA-Z]+) +(?P<time>(\d+\w)+|never|[0-9:]+) +(?P<attrb>\w+)$",
    )
    .expect("static regex must compile"),
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let peer = Schema::mapping(vec![
        Field::required("tunnel_addr", Schema::Str),
        Field::required("state", Schema::Str),
        Field::required("time", Schema::Str),
        Field::required("attrb", Schema::Str),
        Field::required("ent", Schema::Int),
    ]);
    Schema::mapping(vec![Field::required(
        "dmvpn",
        Schema::mapping(vec![Field::any(Schema::mapping(vec![
            Field::required("total_peers", Schema::Int),
            Field::required("type", Schema::Str),
            Field::required(
                "peers",
                Schema::mapping(vec![Field::any(Schema::mapping(vec![Field::any(peer)]))]),
            ),
        ]))]),
    )])
});

/// Declared shape of [`parse`]'s result.
pub fn schema() -> &'static Schema {
    &SCHEMA
}

#[derive(Default)]
struct State {
    out: Value,
    interface: Option<String>,
}

impl State {
    fn new() -> Self {
        Self {
            out: Value::map(),
            interface: None,
        }
    }

    fn tunnel(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        let interface = self
            .interface
            .as_deref()
            .ok_or(ParseError::MissingContext {
                rule,
                context: "interface",
            })?
            .to_string();
        Ok(self.out.entry("dmvpn").entry(interface))
    }
}

fn rules() -> Vec<LineRule<State>> {
    vec![
        LineRule::new("interface", &PATTERNS.interface, |caps, state: &mut State| {
            let interface = engine::str_group(caps, "interface").to_string();
            state
                .out
                .entry("dmvpn")
                .entry(interface.clone())
                .entry("peers");
            state.interface = Some(interface);
            Ok(())
        }),
        LineRule::new("summary", &PATTERNS.summary, |caps, state: &mut State| {
            let tunnel_type = engine::str_group(caps, "type").to_string();
            let total_peers = engine::int_group(caps, "total_peers")?;
            let tunnel = state.tunnel("summary")?;
            tunnel.insert("type", tunnel_type);
            tunnel.insert("total_peers", total_peers);
            Ok(())
        }),
        LineRule::new("peer", &PATTERNS.peer, |caps, state: &mut State| {
            let nbma_addr = engine::str_group(caps, "nbma_addr").to_string();
            let family = engine::classify_address(&nbma_addr);
            let ent = engine::int_group(caps, "ent")?;
            let tunnel_addr = engine::str_group(caps, "tunnel_addr").to_string();
            let peer_state = engine::str_group(caps, "state").to_string();
            let time = engine::str_group(caps, "time").to_string();
            let attrb = engine::str_group(caps, "attrb").to_string();

            let peer = state
                .tunnel("peer")?
                .entry("peers")
                .entry(family.key())
                .entry(nbma_addr);
            peer.insert("tunnel_addr", tunnel_addr);
            peer.insert("state", peer_state);
            peer.insert("time", time);
            peer.insert("attrb", attrb);
            peer.insert("ent", ent);
            Ok(())
        }),
    ]
}

/// Parses pre-captured `show dmvpn` output.
pub fn parse(output: &str) -> Result<Value, ParseError> {
    let mut state = State::new();
    engine::scan_lines(output, &rules(), &mut state)?;
    engine::finish(state.out, schema())
}

/// Executes the command on `device` (scoped to `interface` when given) and
/// parses its output.
pub fn from_device(device: &mut dyn Device, interface: Option<&str>) -> Result<Value, ParseError> {
    let command = match interface {
        Some(interface) => CLI_COMMAND_INTERFACE.replace("{interface}", interface),
        None => CLI_COMMAND.to_string(),
    };
    let output = device.execute(&command)?;
    parse(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLDEN: &str = "\
Interface: Tunnel84, IPv4 NHRP Details
Type:Spoke, NHRP Peers:1,

 # Ent  Peer NBMA Addr Peer Tunnel Add State  UpDn Tm Attrb
 ----- --------------- --------------- ----- -------- -----
     1 172.29.0.1          172.30.90.1    UP    6d12h     S
";

    #[test]
    fn test_single_spoke_tunnel() {
        let parsed = parse(GOLDEN).expect("golden output should parse");

        let tunnel = parsed
            .get("dmvpn")
            .and_then(|d| d.get("Tunnel84"))
            .expect("tunnel entry");
        assert_eq!(tunnel.get("type").and_then(Value::as_str), Some("Spoke"));
        assert_eq!(tunnel.get("total_peers").and_then(Value::as_int), Some(1));

        let peer = tunnel
            .get("peers")
            .and_then(|p| p.get("ipv4"))
            .and_then(|f| f.get("172.29.0.1"))
            .expect("peer bucketed under ipv4 by literal form");
        assert_eq!(
            peer.get("tunnel_addr").and_then(Value::as_str),
            Some("172.30.90.1")
        );
        assert_eq!(peer.get("state").and_then(Value::as_str), Some("UP"));
        assert_eq!(peer.get("time").and_then(Value::as_str), Some("6d12h"));
        assert_eq!(peer.get("attrb").and_then(Value::as_str), Some("S"));
        assert_eq!(peer.get("ent").and_then(Value::as_int), Some(1));
    }

    #[test]
    fn test_ipv6_nbma_addresses_bucket_separately() {
        let output = "\
Interface: Tunnel1, IPv6 NHRP Details
Type:Hub, NHRP Peers:2,
     1 2001:db8::1         172.30.90.1    UP     3w5d     S
     1 172.29.0.2          172.30.90.2   IKE    never     S
";
        let parsed = parse(output).unwrap();
        let peers = parsed
            .get("dmvpn")
            .and_then(|d| d.get("Tunnel1"))
            .and_then(|t| t.get("peers"))
            .unwrap();

        assert!(peers.get("ipv6").and_then(|f| f.get("2001:db8::1")).is_some());
        assert!(peers.get("ipv4").and_then(|f| f.get("172.29.0.2")).is_some());
        assert!(peers.get("ipv4").and_then(|f| f.get("2001:db8::1")).is_none());
    }

    #[test]
    fn test_peer_row_before_interface_header_is_missing_context() {
        let output = "     1 172.29.0.1          172.30.90.1    UP    6d12h     S\n";
        assert_eq!(
            parse(output),
            Err(ParseError::MissingContext {
                rule: "peer",
                context: "interface",
            })
        );
    }

    #[test]
    fn test_empty_output_is_empty_result() {
        assert_eq!(parse(""), Err(ParseError::EmptyResult));
        assert_eq!(parse("banner text only\n"), Err(ParseError::EmptyResult));
    }

    #[test]
    fn test_parse_is_idempotent() {
        assert_eq!(parse(GOLDEN).unwrap(), parse(GOLDEN).unwrap());
    }
}
