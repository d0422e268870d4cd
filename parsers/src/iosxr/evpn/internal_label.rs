//! Parser for `show evpn internal-label`.
//!
//! One row per (EVI, ethernet segment, ether-tag) label allocation, with
//! an optional encapsulation column on newer releases, followed by the
//! summary pathlist rows:
//!
//! ```text
//! EVI   Ethernet Segment Id         EtherTag   Label
//! ----- --------------------------- ---------- --------
//! 1000  0000.0102.0304.0506.07aa    0          None
//! 1000  0000.0102.0304.0506.07aa    200        24011
//!       0xffffffff (P) 192.168.0.3              29213
//! ```
//!
//! Rows for the same segment id are numbered with a 1-based index in
//! encounter order; the pathlist index runs across the whole parse. Label
//! and ether-tag columns stay textual (`None` is a legitimate label).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use netshow_core::{Field, Key, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;

pub const CLI_COMMAND: &str = "show evpn internal-label";

struct Patterns {
    // 1000 0000.0102.0304.0506.07aa 200 24011
    // 100        MPLS   0036.3700.0000.0000.1100    0          64006
    row: Regex,
    // 0xffffffff (P) 192.168.0.3                              29213
    pathlist: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    row: Regex::new(
        r"^(?P<evi>\d+)( +(?P<encap>\S+))? +(?P<ethernet_segment_id>[\w\.]+) +(?P<ether_tag>\S+) +(?P<label>\S+)$",
    )
    .expect("static regex must compile"),
    pathlist: Regex::new(
        r"^(?P<tep_id>\S+) +(?P<df_role>\(\w\)) +(?P<nexthop>\S+) +(?P<label>\S+)$",
    )
    .expect("static regex must compile"),
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let pathlist_entry = Schema::mapping(vec![
        Field::required("tep_id", Schema::Str),
        Field::required("df_role", Schema::Str),
        Field::required("nexthop", Schema::Str),
        Field::required("label", Schema::Str),
    ]);
    let allocation = Schema::mapping(vec![
        Field::required("ether_tag", Schema::Str),
        Field::required("label", Schema::Str),
        Field::optional("encap", Schema::Str),
        Field::optional(
            "summary_pathlist",
            Schema::mapping(vec![Field::required(
                "index",
                Schema::mapping(vec![Field::any(pathlist_entry)]),
            )]),
        ),
    ]);
    Schema::mapping(vec![Field::required(
        "evi",
        Schema::mapping(vec![Field::any(Schema::mapping(vec![Field::required(
            "ethernet_segment_id",
            Schema::mapping(vec![Field::any(Schema::mapping(vec![Field::required(
                "index",
                Schema::mapping(vec![Field::any(allocation)]),
            )]))]),
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
    // Cursor to the allocation the next pathlist rows attach to.
    cursor: Option<(i64, String, i64)>,
    row_index: HashMap<String, i64>,
    pathlist_index: i64,
}

impl State {
    fn allocation(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        let (evi, segment_id, index) = self
            .cursor
            .clone()
            .ok_or(ParseError::MissingContext {
                rule,
                context: "allocation",
            })?;
        Ok(self
            .out
            .entry("evi")
            .entry(Key::Int(evi))
            .entry("ethernet_segment_id")
            .entry(segment_id)
            .entry("index")
            .entry(Key::Int(index)))
    }
}

fn rules() -> Vec<LineRule<State>> {
    vec![
        LineRule::new("row", &PATTERNS.row, |caps, state: &mut State| {
            let evi = engine::int_group(caps, "evi")?;
            let segment_id = engine::str_group(caps, "ethernet_segment_id").to_string();
            let ether_tag = engine::str_group(caps, "ether_tag").to_string();
            let label = engine::str_group(caps, "label").to_string();
            let encap = caps.name("encap").map(|m| m.as_str().to_string());

            let index = state.row_index.get(&segment_id).copied().unwrap_or(0) + 1;
            state.row_index.insert(segment_id.clone(), index);
            state.cursor = Some((evi, segment_id, index));

            let allocation = state.allocation("row")?;
            allocation.insert("ether_tag", ether_tag);
            allocation.insert("label", label);
            if let Some(encap) = encap {
                allocation.insert("encap", encap);
            }
            Ok(())
        }),
        LineRule::new("pathlist", &PATTERNS.pathlist, |caps, state: &mut State| {
            let tep_id = engine::str_group(caps, "tep_id").to_string();
            let df_role = engine::str_group(caps, "df_role").to_string();
            let nexthop = engine::str_group(caps, "nexthop").to_string();
            let label = engine::str_group(caps, "label").to_string();

            state.pathlist_index += 1;
            let index = state.pathlist_index;
            let entry = state
                .allocation("pathlist")?
                .entry("summary_pathlist")
                .entry("index")
                .entry(Key::Int(index));
            entry.insert("tep_id", tep_id);
            entry.insert("df_role", df_role);
            entry.insert("nexthop", nexthop);
            entry.insert("label", label);
            Ok(())
        }),
    ]
}

/// Parses pre-captured `show evpn internal-label` output.
pub fn parse(output: &str) -> Result<Value, ParseError> {
    let mut state = State::default();
    engine::scan_lines(output, &rules(), &mut state)?;
    engine::finish(state.out, schema())
}

/// Executes `show evpn internal-label` on `device` and parses its output.
pub fn from_device(device: &mut dyn Device) -> Result<Value, ParseError> {
    let output = device.execute(CLI_COMMAND)?;
    parse(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_indexed_per_segment() {
        let output = "\
EVI   Ethernet Segment Id         EtherTag   Label
----- --------------------------- ---------- --------
1000  0000.0102.0304.0506.07aa    0          None
1000  0000.0102.0304.0506.07aa    200        24011
";
        let parsed = parse(output).expect("table should parse");
        let indexes = parsed
            .get("evi")
            .and_then(|e| e.get(Key::Int(1000)))
            .and_then(|e| e.get("ethernet_segment_id"))
            .and_then(|s| s.get("0000.0102.0304.0506.07aa"))
            .and_then(|s| s.get("index"))
            .expect("index table");

        let first = indexes.get(Key::Int(1)).expect("first allocation");
        assert_eq!(first.get("ether_tag").and_then(Value::as_str), Some("0"));
        assert_eq!(first.get("label").and_then(Value::as_str), Some("None"));
        assert!(first.get("encap").is_none());

        let second = indexes.get(Key::Int(2)).expect("second allocation");
        assert_eq!(second.get("ether_tag").and_then(Value::as_str), Some("200"));
        assert_eq!(second.get("label").and_then(Value::as_str), Some("24011"));
    }

    #[test]
    fn test_encap_column_and_pathlist() {
        let output = "\
100        MPLS   0036.3700.0000.0000.1100    0          64006
   Summary pathlist:
   0xffffffff (P) 192.168.0.3                              29213
   0xffffffff (B) 192.168.0.4                              29214
";
        let parsed = parse(output).unwrap();
        let allocation = parsed
            .get("evi")
            .and_then(|e| e.get(Key::Int(100)))
            .and_then(|e| e.get("ethernet_segment_id"))
            .and_then(|s| s.get("0036.3700.0000.0000.1100"))
            .and_then(|s| s.get("index"))
            .and_then(|i| i.get(Key::Int(1)))
            .expect("allocation");

        assert_eq!(allocation.get("encap").and_then(Value::as_str), Some("MPLS"));
        assert_eq!(allocation.get("label").and_then(Value::as_str), Some("64006"));

        let pathlist = allocation
            .get("summary_pathlist")
            .and_then(|p| p.get("index"))
            .expect("pathlist index table");
        let first = pathlist.get(Key::Int(1)).expect("first path");
        assert_eq!(first.get("df_role").and_then(Value::as_str), Some("(P)"));
        assert_eq!(
            first.get("nexthop").and_then(Value::as_str),
            Some("192.168.0.3")
        );
        assert_eq!(first.get("label").and_then(Value::as_str), Some("29213"));
        let second = pathlist.get(Key::Int(2)).expect("second path");
        assert_eq!(second.get("df_role").and_then(Value::as_str), Some("(B)"));
    }

    #[test]
    fn test_pathlist_before_any_row_is_missing_context() {
        assert_eq!(
            parse("0xffffffff (P) 192.168.0.3                              29213\n"),
            Err(ParseError::MissingContext {
                rule: "pathlist",
                context: "allocation",
            })
        );
    }

    #[test]
    fn test_empty_output_is_empty_result() {
        assert_eq!(parse(""), Err(ParseError::EmptyResult));
    }
}
