//! Parser for `show evpn evi` / `show evpn evi detail`.
//!
//! The table lists one row per EVPN instance; the detail variant follows
//! each row with route targets and `Key : Value` attribute lines:
//!
//! ```text
//! EVI        Bridge Domain                Type
//! ---------- ---------------------------- -------------------
//! 1000       VPWS:1000                    VPWS (vlan-unaware)
//!    Unicast Label  : 24001
//!    Multicast Label: 16001
//!    RD Auto  : (auto) 1.100.100.100:145
//!    RT Auto  : 100:145
//!       100:145                        Import
//!       100:145                        Export
//! ```
//!
//! Instances are keyed by their numeric EVI. Attribute lines are generic:
//! the label text lowercased with spaces collapsed to underscores becomes
//! the field name.

use std::sync::LazyLock;

use regex::Regex;

use netshow_core::{Field, Key, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;

pub const CLI_COMMAND: &str = "show evpn evi";
pub const CLI_COMMAND_DETAIL: &str = "show evpn evi detail";

struct Patterns {
    // ---------- ---------------------------- -------------------
    separator: Regex,
    // 1000  VPWS:1000       VPWS (vlan-unaware)
    row: Regex,
    // 100:145                        Import
    route_target: Regex,
    // Unicast Label  : 24001
    attribute: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    separator: Regex::new(r"^(-+ *)+$").expect("static regex must compile"),
    row: Regex::new(r"^(?P<evi>\d+) +(?P<bridge_domain>\S+) +(?P<type>.+)$")
        .expect("static regex must compile"),
    route_target: Regex::new(r"^(?P<route_target>[\d:]+) +(?P<type>\S+)$")
        .expect("static regex must compile"),
    attribute: Regex::new(r"^(?P<key>[\S ]+?) *: +(?P<value>[\S ]+)$")
        .expect("static regex must compile"),
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let evi = Schema::mapping(vec![
        Field::required("bridge_domain", Schema::Str),
        Field::required("type", Schema::Str),
        Field::optional(
            "route_target_in_use",
            Schema::mapping(vec![Field::any(Schema::mapping(vec![Field::any(
                Schema::Bool,
            )]))]),
        ),
        // Detail attributes are free-form Key : Value lines.
        Field::any(Schema::Str),
    ]);
    Schema::mapping(vec![Field::required(
        "evi",
        Schema::mapping(vec![Field::any(evi)]),
    )])
});

/// Declared shape of [`parse`]'s result.
pub fn schema() -> &'static Schema {
    &SCHEMA
}

#[derive(Default)]
struct State {
    out: Value,
    evi: Option<i64>,
}

impl State {
    fn evi(&mut self, rule: &'static str) -> Result<&mut Value, ParseError> {
        let evi = self.evi.ok_or(ParseError::MissingContext {
            rule,
            context: "evi",
        })?;
        Ok(self.out.entry("evi").entry(Key::Int(evi)))
    }
}

fn rules() -> Vec<LineRule<State>> {
    vec![
        // Column separators are consumed explicitly so they can never be
        // mistaken for a detail row.
        LineRule::new("separator", &PATTERNS.separator, |_, _: &mut State| Ok(())),
        LineRule::new("row", &PATTERNS.row, |caps, state: &mut State| {
            let evi = engine::int_group(caps, "evi")?;
            let bridge_domain = engine::str_group(caps, "bridge_domain").to_string();
            let evi_type = engine::str_group(caps, "type").to_string();

            let entry = state.out.entry("evi").entry(Key::Int(evi));
            entry.insert("bridge_domain", bridge_domain);
            entry.insert("type", evi_type);
            state.evi = Some(evi);
            Ok(())
        }),
        LineRule::new(
            "route_target",
            &PATTERNS.route_target,
            |caps, state: &mut State| {
                let route_target = engine::str_group(caps, "route_target").to_string();
                let direction = engine::str_group(caps, "type").to_lowercase();
                state
                    .evi("route_target")?
                    .entry("route_target_in_use")
                    .entry(route_target)
                    .insert(direction, true);
                Ok(())
            },
        ),
        LineRule::new("attribute", &PATTERNS.attribute, |caps, state: &mut State| {
            let key = engine::str_group(caps, "key")
                .to_lowercase()
                .replace(' ', "_");
            let value = engine::str_group(caps, "value").to_string();
            state.evi("attribute")?.insert(key, value);
            Ok(())
        }),
    ]
}

/// Parses pre-captured `show evpn evi` output (plain or detail).
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keyed_by_integer_evi() {
        let output = "\
EVI        Bridge Domain                Type
---------- ---------------------------- -------------------
1000       VPWS:1000                    VPWS (vlan-unaware)
2000       XC-POD1-EVPN                 EVPN
2001       XC-POD2-EVPN                 EVPN
";
        let parsed = parse(output).expect("table should parse");
        let evis = parsed.get("evi").expect("evi root");

        let vpws = evis.get(Key::Int(1000)).expect("keyed by integer 1000");
        assert_eq!(
            vpws.get("bridge_domain").and_then(Value::as_str),
            Some("VPWS:1000")
        );
        assert_eq!(
            vpws.get("type").and_then(Value::as_str),
            Some("VPWS (vlan-unaware)")
        );
        assert!(evis.get(Key::Int(2000)).is_some());
        assert!(evis.get(Key::Int(2001)).is_some());
        // String form of the same number is a different key.
        assert!(evis.get("1000").is_none());
    }

    #[test]
    fn test_detail_attributes_and_route_targets() {
        let output = "\
1000       VPWS:1000                    VPWS (vlan-unaware)
   Unicast Label  : 24001
   Multicast Label: 16001
   RD Auto  : (auto) 1.100.100.100:145
      100:145                        Import
      100:145                        Export
";
        let parsed = parse(output).unwrap();
        let evi = parsed.get("evi").and_then(|e| e.get(Key::Int(1000))).unwrap();

        assert_eq!(
            evi.get("unicast_label").and_then(Value::as_str),
            Some("24001")
        );
        assert_eq!(
            evi.get("multicast_label").and_then(Value::as_str),
            Some("16001")
        );
        assert_eq!(
            evi.get("rd_auto").and_then(Value::as_str),
            Some("(auto) 1.100.100.100:145")
        );

        let rt = evi
            .get("route_target_in_use")
            .and_then(|r| r.get("100:145"))
            .expect("route target entry");
        assert_eq!(rt.get("import").and_then(Value::as_bool), Some(true));
        assert_eq!(rt.get("export").and_then(Value::as_bool), Some(true));
    }

    #[test]
    fn test_detail_line_before_any_row_is_missing_context() {
        assert_eq!(
            parse("   Unicast Label  : 24001\n"),
            Err(ParseError::MissingContext {
                rule: "attribute",
                context: "evi",
            })
        );
    }

    #[test]
    fn test_route_target_before_any_row_is_missing_context() {
        assert_eq!(
            parse("      100:145                        Import\n"),
            Err(ParseError::MissingContext {
                rule: "route_target",
                context: "evi",
            })
        );
    }

    #[test]
    fn test_separator_lines_build_nothing() {
        // Consumed by the no-op rule; a separator-only capture is still an
        // empty result.
        assert_eq!(
            parse("---------- ---------------------------- -------------------\n"),
            Err(ParseError::EmptyResult)
        );
    }

    #[test]
    fn test_empty_output_is_empty_result() {
        assert_eq!(parse(""), Err(ParseError::EmptyResult));
    }
}
