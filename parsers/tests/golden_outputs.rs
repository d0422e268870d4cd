//! End-to-end runs of every parser over captured device output.
//!
//! Each case loads a fixture from `tests/fixtures/`, parses it, and checks
//! the resulting structure. Every result is also re-validated against the
//! module's declared schema; `parse` already does that internally, so the
//! explicit call here guards against the schema and the handlers drifting
//! apart.

use std::fs;
use std::path::PathBuf;

use serde_json::json;

use netshow_core::{Key, Value, validate};
use netshow_parsers::iosxe::{cts, dmvpn};
use netshow_parsers::iosxr::evpn::{ethernet_segment, evi, internal_label, mac};
use netshow_parsers::ironware::mpls::{lsp, vll};
use netshow_parsers::junos::arp;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

#[test]
fn dmvpn_single_spoke_exact_structure() {
    let parsed = dmvpn::parse(&fixture("dmvpn.txt")).expect("dmvpn fixture should parse");

    assert_eq!(
        parsed.to_json(),
        json!({
            "dmvpn": {
                "Tunnel84": {
                    "type": "Spoke",
                    "total_peers": 1,
                    "peers": {
                        "ipv4": {
                            "172.29.0.1": {
                                "tunnel_addr": "172.30.90.1",
                                "state": "UP",
                                "time": "6d12h",
                                "attrb": "S",
                                "ent": 1,
                            }
                        }
                    }
                }
            }
        })
    );
    assert!(validate(dmvpn::schema(), &parsed).is_ok());
}

#[test]
fn cts_rbacl_blocks() {
    let parsed = cts::parse(&fixture("cts_rbacl.txt")).expect("cts fixture should parse");
    let root = parsed.get("cts_rbacl").expect("cts_rbacl root");

    assert_eq!(
        root.get("ip_ver_support").and_then(Value::as_str),
        Some("IPv4 & IPv6")
    );
    // One mapping entry per RBACL block plus the support line.
    assert_eq!(root.as_map().map(|m| m.len()), Some(5));

    for (name, port) in [
        ("TCP_51005-01", 51005),
        ("TCP_51060-02", 51060),
        ("TCP_51144-01", 51144),
        ("TCP_51009-01", 51009),
    ] {
        let rbacl = root.get(name).unwrap_or_else(|| panic!("rbacl {name}"));
        assert_eq!(
            rbacl.get("ip_protocol_version").and_then(Value::as_str),
            Some("IPV4")
        );
        assert_eq!(rbacl.get("stale").and_then(Value::as_bool), Some(false));
        let ace = rbacl.get(Key::Int(1)).expect("first ace");
        assert_eq!(ace.get("action").and_then(Value::as_str), Some("permit"));
        assert_eq!(ace.get("direction").and_then(Value::as_str), Some("dst"));
        assert_eq!(ace.get("port").and_then(Value::as_int), Some(port));
    }
    assert_eq!(
        root.get("TCP_51144-01")
            .and_then(|r| r.get("refcnt"))
            .and_then(Value::as_int),
        Some(10)
    );

    assert!(validate(cts::schema(), &parsed).is_ok());
}

#[test]
fn evpn_evi_table() {
    let parsed = evi::parse(&fixture("evpn_evi.txt")).expect("evi fixture should parse");
    let evis = parsed.get("evi").expect("evi root");

    assert_eq!(evis.as_map().map(|m| m.len()), Some(3));
    let vpws = evis.get(Key::Int(1000)).expect("keyed by integer evi");
    assert_eq!(
        vpws.get("bridge_domain").and_then(Value::as_str),
        Some("VPWS:1000")
    );
    assert_eq!(
        vpws.get("type").and_then(Value::as_str),
        Some("VPWS (vlan-unaware)")
    );
    assert_eq!(
        evis.get(Key::Int(2001))
            .and_then(|e| e.get("bridge_domain"))
            .and_then(Value::as_str),
        Some("XC-POD2-EVPN")
    );

    assert!(validate(evi::schema(), &parsed).is_ok());
}

#[test]
fn evpn_mac_private_details() {
    let parsed = mac::parse(&fixture("evpn_mac.txt")).expect("mac fixture should parse");
    let entry = parsed
        .get("vpn_id")
        .and_then(|v| v.get(Key::Int(65535)))
        .and_then(|v| v.get("mac_address"))
        .and_then(|m| m.get("0000.0000.0000"))
        .expect("mac entry");

    assert_eq!(entry.get("ip_address").and_then(Value::as_str), Some("::"));
    assert_eq!(entry.get("label").and_then(Value::as_int), Some(0));
    assert_eq!(entry.get("ethernet_tag").and_then(Value::as_int), Some(0));
    assert_eq!(entry.get("flush_count").and_then(Value::as_int), Some(0));
    assert_eq!(entry.get("source").and_then(Value::as_str), Some("Local"));
    assert_eq!(
        entry.get("local_router_mac").and_then(Value::as_str),
        Some("0000.0000.0000")
    );

    let object = entry
        .get("object")
        .and_then(|o| o.get("EVPN MAC"))
        .expect("object section");
    assert_eq!(object.get("num_events").and_then(Value::as_int), Some(2));
    let history = object.get("event_history").expect("event history");
    assert_eq!(
        history
            .get(Key::Int(2))
            .and_then(|e| e.get("event"))
            .and_then(Value::as_str),
        Some("MAC advertise rejected")
    );

    assert!(validate(mac::schema(), &parsed).is_ok());
}

#[test]
fn evpn_ethernet_segment_detail() {
    let parsed = ethernet_segment::parse(&fixture("evpn_ethernet_segment.txt"))
        .expect("segment fixture should parse");
    let intf = parsed
        .get("segment_id")
        .and_then(|s| s.get("0036.3700.0000.0000.1100"))
        .and_then(|s| s.get("interface"))
        .and_then(|i| i.get("GigabitEthernet0/3/0/0"))
        .expect("interface keyed by canonical name");

    assert_eq!(
        intf.get("next_hops").and_then(Value::as_list),
        Some(&[Value::from("3.3.3.36"), Value::from("3.3.3.37")][..])
    );
    assert_eq!(
        intf.get("main_port")
            .and_then(|m| m.get("if_handle"))
            .and_then(Value::as_str),
        Some("0x1800300")
    );
    assert_eq!(
        intf.get("esi")
            .and_then(|e| e.get("type"))
            .and_then(Value::as_int),
        Some(0)
    );
    assert_eq!(
        intf.get("service_carving_results")
            .and_then(|c| c.get("not_elected"))
            .and_then(|n| n.get("i_sid_ne"))
            .and_then(Value::as_list)
            .map(|l| l.len()),
        Some(3)
    );
    assert_eq!(
        intf.get("remote_shg_labels")
            .and_then(|r| r.get("1"))
            .and_then(|r| r.get("label"))
            .and_then(|l| l.get("64005"))
            .and_then(|l| l.get("nexthop"))
            .and_then(Value::as_str),
        Some("3.3.3.37")
    );

    assert!(validate(ethernet_segment::schema(), &parsed).is_ok());
}

#[test]
fn evpn_internal_label_indexing() {
    let parsed = internal_label::parse(&fixture("evpn_internal_label.txt"))
        .expect("label fixture should parse");
    let indexes = parsed
        .get("evi")
        .and_then(|e| e.get(Key::Int(1000)))
        .and_then(|e| e.get("ethernet_segment_id"))
        .and_then(|s| s.get("0000.0102.0304.0506.07aa"))
        .and_then(|s| s.get("index"))
        .expect("index table");

    // Four rows for the same segment, numbered in encounter order.
    assert_eq!(indexes.as_map().map(|m| m.len()), Some(4));
    assert_eq!(
        indexes
            .get(Key::Int(1))
            .and_then(|a| a.get("label"))
            .and_then(Value::as_str),
        Some("None")
    );
    assert_eq!(
        indexes
            .get(Key::Int(4))
            .and_then(|a| a.get("ether_tag"))
            .and_then(Value::as_str),
        Some("202")
    );

    assert!(validate(internal_label::schema(), &parsed).is_ok());
}

#[test]
fn mpls_lsp_table() {
    let parsed = lsp::parse(&fixture("mpls_lsp.txt")).expect("lsp fixture should parse");
    let lsps = parsed.get("lsps").expect("lsps root");

    assert_eq!(lsps.as_map().map(|m| m.len()), Some(4));
    assert_eq!(
        lsps.get("mlx8.1_to_ces.1")
            .and_then(|l| l.get("tunnel_interface"))
            .and_then(Value::as_str),
        Some("tnl56")
    );
    let down = lsps.get("mlx8.1_to_mlx8.3").expect("down lsp");
    assert_eq!(down.get("operational").and_then(Value::as_str), Some("DOWN"));
    assert!(down.get("tunnel_interface").is_none());

    assert!(validate(lsp::schema(), &parsed).is_ok());
}

#[test]
fn mpls_vll_record() {
    let parsed =
        vll::parse(&fixture("mpls_vll.txt"), "VLL-TEST1").expect("vll fixture should parse");
    let record = parsed
        .get("vll")
        .and_then(|v| v.get("VLL-TEST1"))
        .expect("keyed by requested name");

    assert_eq!(record.get("vcid").and_then(Value::as_int), Some(2456));
    assert_eq!(
        record
            .get("local")
            .and_then(|l| l.get("vlan_id"))
            .and_then(Value::as_int),
        Some(3043)
    );
    let peer = record.get("peer").expect("peer block");
    assert_eq!(peer.get("ip").and_then(Value::as_str), Some("192.168.1.1"));
    assert_eq!(peer.get("local_label").and_then(Value::as_int), Some(852217));
    assert_eq!(
        peer.get("tunnel_lsp")
            .and_then(|t| t.get("tunnel_interface"))
            .and_then(Value::as_str),
        Some("tnl15")
    );

    assert!(validate(vll::schema(), &parsed).is_ok());
}

#[test]
fn junos_arp_table() {
    let parsed = arp::parse(&fixture("arp.txt")).expect("arp fixture should parse");
    let info = parsed.get("arp-table-information").expect("root");

    assert_eq!(
        info.get("arp-entry-count").and_then(Value::as_str),
        Some("7")
    );
    let entries = info
        .get("arp-table-entry")
        .and_then(Value::as_list)
        .expect("entry list");
    assert_eq!(entries.len(), 7);
    assert_eq!(
        entries[0].get("ip-address").and_then(Value::as_str),
        Some("1.0.0.1")
    );
    assert_eq!(
        entries[3].get("mac-address").and_then(Value::as_str),
        Some("50:3d:e5:c1:b1:c1")
    );
    assert_eq!(
        entries[6].get("interface-name").and_then(Value::as_str),
        Some("fxp0.0")
    );

    assert!(validate(arp::schema(), &parsed).is_ok());
}

#[test]
fn parsing_the_same_capture_twice_is_identical() {
    let dmvpn_text = fixture("dmvpn.txt");
    assert_eq!(
        dmvpn::parse(&dmvpn_text).unwrap(),
        dmvpn::parse(&dmvpn_text).unwrap()
    );

    let segment_text = fixture("evpn_ethernet_segment.txt");
    assert_eq!(
        ethernet_segment::parse(&segment_text).unwrap(),
        ethernet_segment::parse(&segment_text).unwrap()
    );
}
