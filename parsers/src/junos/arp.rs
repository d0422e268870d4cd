//! Parser for `show arp` / `show arp | no-more`.
//!
//! One row per ARP entry plus a trailing count line:
//!
//! ```text
//! MAC Address       Address         Name                      Interface               Flags
//! 00:50:56:8d:2d:e1 1.0.0.1         1.0.0.1                   fxp0.0                  none
//! Total entries: 7
//! ```
//!
//! Entries are collected in output order as a sequence; each element is
//! validated individually against the entry shape. The entry count stays a
//! string, matching the device's own rendering, and only the first count
//! line seen is kept.

use std::sync::LazyLock;

use regex::Regex;

use netshow_core::{Field, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;

pub const CLI_COMMAND: &str = "show arp";
pub const CLI_COMMAND_NO_MORE: &str = "show arp | no-more";

struct Patterns {
    // 00:50:56:8d:2d:e1 1.0.0.1         1.0.0.1                   fxp0.0                  none
    entry: Regex,
    // Total entries: 7
    total_entries: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    entry: Regex::new(
        r"^(?P<mac_address>[\w:]+) +(?P<address>\S+) +(?P<name>\S+) +(?P<interface>\S+) +(?P<flags>\S+)$",
    )
    .expect("static regex must compile"),
    total_entries: Regex::new(r"^Total +entries: +(?P<total_entries>\d+)$")
        .expect("static regex must compile"),
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let entry = Schema::mapping(vec![
        Field::required("arp-table-entry-flags", Schema::Str),
        Field::required("hostname", Schema::Str),
        Field::required("interface-name", Schema::Str),
        Field::required("ip-address", Schema::Str),
        Field::required("mac-address", Schema::Str),
    ]);
    Schema::mapping(vec![Field::required(
        "arp-table-information",
        Schema::mapping(vec![
            Field::required("arp-entry-count", Schema::Str),
            Field::required("arp-table-entry", Schema::each(entry)),
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
}

fn rules() -> Vec<LineRule<State>> {
    vec![
        LineRule::new("entry", &PATTERNS.entry, |caps, state: &mut State| {
            let mut entry = Value::map();
            entry.insert("interface-name", engine::str_group(caps, "interface"));
            entry.insert("mac-address", engine::str_group(caps, "mac_address"));
            entry.insert("ip-address", engine::str_group(caps, "address"));
            entry.insert("hostname", engine::str_group(caps, "name"));
            entry.insert("arp-table-entry-flags", engine::str_group(caps, "flags"));
            state
                .out
                .entry("arp-table-information")
                .or_insert("arp-table-entry", Value::list())
                .push(entry);
            Ok(())
        }),
        LineRule::new(
            "total_entries",
            &PATTERNS.total_entries,
            |caps, state: &mut State| {
                let count = engine::str_group(caps, "total_entries").to_string();
                state
                    .out
                    .entry("arp-table-information")
                    .or_insert("arp-entry-count", Value::from(count));
                Ok(())
            },
        ),
    ]
}

/// Parses pre-captured `show arp` output.
pub fn parse(output: &str) -> Result<Value, ParseError> {
    let mut state = State::default();
    engine::scan_lines(output, &rules(), &mut state)?;
    engine::finish(state.out, schema())
}

/// Executes `show arp` on `device` and parses its output.
pub fn from_device(device: &mut dyn Device) -> Result<Value, ParseError> {
    let output = device.execute(CLI_COMMAND)?;
    parse(&output)
}

/// Executes `show arp | no-more` on `device` and parses its output. The
/// pager suffix changes only how the device emits text, not its shape.
pub fn from_device_no_more(device: &mut dyn Device) -> Result<Value, ParseError> {
    let output = device.execute(CLI_COMMAND_NO_MORE)?;
    parse(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLDEN: &str = "\
MAC Address       Address         Name                      Interface               Flags
00:50:56:8d:2d:e1 1.0.0.1         1.0.0.1                   fxp0.0                  none
00:50:56:8d:72:9c 10.1.0.1        10.1.0.1                  ge-0/0/2.0              none
Total entries: 7
";

    #[test]
    fn test_entries_collected_in_order() {
        let parsed = parse(GOLDEN).expect("golden output should parse");
        let info = parsed.get("arp-table-information").expect("root");

        // Count is kept as the device's own string rendering.
        assert_eq!(
            info.get("arp-entry-count").and_then(Value::as_str),
            Some("7")
        );

        let entries = info
            .get("arp-table-entry")
            .and_then(Value::as_list)
            .expect("entry list");
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].get("mac-address").and_then(Value::as_str),
            Some("00:50:56:8d:2d:e1")
        );
        assert_eq!(
            entries[0].get("interface-name").and_then(Value::as_str),
            Some("fxp0.0")
        );
        assert_eq!(
            entries[1].get("hostname").and_then(Value::as_str),
            Some("10.1.0.1")
        );
        assert_eq!(
            entries[1].get("arp-table-entry-flags").and_then(Value::as_str),
            Some("none")
        );
    }

    #[test]
    fn test_first_count_line_wins() {
        let output = "\
00:50:56:8d:2d:e1 1.0.0.1         1.0.0.1                   fxp0.0                  none
Total entries: 1
Total entries: 9
";
        let parsed = parse(output).unwrap();
        assert_eq!(
            parsed
                .get("arp-table-information")
                .and_then(|i| i.get("arp-entry-count"))
                .and_then(Value::as_str),
            Some("1")
        );
    }

    #[test]
    fn test_empty_output_is_empty_result() {
        assert_eq!(parse(""), Err(ParseError::EmptyResult));
    }
}
