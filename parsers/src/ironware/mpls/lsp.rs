//! Parser for `show mpls lsp`.
//!
//! One row per label-switched path:
//!
//! ```text
//!                                                           Admin Oper  Tunnel   Up/Dn Retry Active
//! Name                                      To              State State Intf     Times No.   Path
//! mlx8.1_to_ces.2                           1.1.1.1         UP    UP    tnl0     1     0     --
//! mlx8.1_to_mlx8.3                          4.4.4.4         DOWN  DOWN  --       0     0     --
//! ```
//!
//! `--` in the tunnel-interface or active-path column means the LSP has
//! none; those keys are omitted rather than carrying the placeholder.

use std::sync::LazyLock;

use regex::Regex;

use netshow_core::{Field, Schema, Value};

use crate::device::Device;
use crate::engine::{self, LineRule};
use crate::error::ParseError;

pub const CLI_COMMAND: &str = "show mpls lsp";

struct Patterns {
    // mlx8.1_to_ces.2    1.1.1.1    UP    UP    tnl0    1    0    --
    row: Regex,
}

static PATTERNS: LazyLock<Patterns> = LazyLock::new(|| Patterns {
    row: Regex::new(
        r"^(?P<name>\S+) +(?P<destination>\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}) +(?P<admin>UP|DOWN) +(?P<operational>UP|DOWN) +(?P<tunnel>tnl\d+|--) +(?P<flap_count>\d+) +(?P<retry_count>\d+) +(?P<path>\S+)$",
    )
    .expect("static regex must compile"),
});

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    let lsp = Schema::mapping(vec![
        Field::required("destination", Schema::Str),
        Field::required("admin", Schema::Str),
        Field::required("operational", Schema::Str),
        Field::required("flap_count", Schema::Int),
        Field::required("retry_count", Schema::Int),
        Field::optional("tunnel_interface", Schema::Str),
        Field::optional("path", Schema::Str),
    ]);
    Schema::mapping(vec![Field::required(
        "lsps",
        Schema::mapping(vec![Field::any(lsp)]),
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
    vec![LineRule::new("row", &PATTERNS.row, |caps, state: &mut State| {
        let name = engine::str_group(caps, "name").to_string();
        let lsp = state.out.entry("lsps").entry(name);
        lsp.insert("destination", engine::str_group(caps, "destination"));
        lsp.insert("admin", engine::str_group(caps, "admin"));
        lsp.insert("operational", engine::str_group(caps, "operational"));
        lsp.insert("flap_count", engine::int_group(caps, "flap_count")?);
        lsp.insert("retry_count", engine::int_group(caps, "retry_count")?);

        let tunnel = engine::str_group(caps, "tunnel");
        if !engine::is_placeholder(tunnel) {
            lsp.insert("tunnel_interface", tunnel);
        }
        let path = engine::str_group(caps, "path");
        if !engine::is_placeholder(path) {
            lsp.insert("path", path);
        }
        Ok(())
    })]
}

/// Parses pre-captured `show mpls lsp` output.
pub fn parse(output: &str) -> Result<Value, ParseError> {
    let mut state = State::default();
    engine::scan_lines(output, &rules(), &mut state)?;
    engine::finish(state.out, schema())
}

/// Executes the command on `device` and parses its output. The `wide`
/// suffix is appended so long LSP names are not truncated into ambiguity.
pub fn from_device(device: &mut dyn Device) -> Result<Value, ParseError> {
    let command = format!("{CLI_COMMAND} wide");
    let output = device.execute(&command)?;
    parse(&output)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOLDEN: &str = "\
Note: LSPs marked with * are taking a Secondary Path
                                                                  Admin Oper  Tunnel   Up/Dn Retry Active
Name                                              To              State State Intf     Times No.   Path
mlx8.1_to_ces.2                                   1.1.1.1         UP    UP    tnl0     1     0     --
mlx8.1_to_ces.1                                   2.2.2.2         UP    UP    tnl56    1     0     --
mlx8.1_to_mlx8.2                                  3.3.3.3         UP    UP    tnl63    1     0     --
mlx8.1_to_mlx8.3                                  4.4.4.4         DOWN  DOWN  --       0     0     --
";

    #[test]
    fn test_lsp_rows() {
        let parsed = parse(GOLDEN).expect("golden output should parse");
        let lsps = parsed.get("lsps").expect("lsps root");
        assert_eq!(lsps.as_map().map(|m| m.len()), Some(4));

        let up = lsps.get("mlx8.1_to_ces.2").expect("up lsp");
        assert_eq!(up.get("destination").and_then(Value::as_str), Some("1.1.1.1"));
        assert_eq!(up.get("admin").and_then(Value::as_str), Some("UP"));
        assert_eq!(up.get("operational").and_then(Value::as_str), Some("UP"));
        assert_eq!(up.get("flap_count").and_then(Value::as_int), Some(1));
        assert_eq!(up.get("retry_count").and_then(Value::as_int), Some(0));
        assert_eq!(
            up.get("tunnel_interface").and_then(Value::as_str),
            Some("tnl0")
        );
        // Active path is "--" for every row here.
        assert!(up.get("path").is_none());
    }

    #[test]
    fn test_placeholder_tunnel_interface_is_omitted() {
        let parsed = parse(GOLDEN).unwrap();
        let down = parsed
            .get("lsps")
            .and_then(|l| l.get("mlx8.1_to_mlx8.3"))
            .unwrap();
        assert!(down.get("tunnel_interface").is_none());
        assert_eq!(down.get("admin").and_then(Value::as_str), Some("DOWN"));
    }

    #[test]
    fn test_empty_output_is_empty_result() {
        assert_eq!(parse(""), Err(ParseError::EmptyResult));
        assert_eq!(
            parse("Name    To    State State Intf Times No. Path\n"),
            Err(ParseError::EmptyResult)
        );
    }
}
