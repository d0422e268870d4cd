//! Show-command output parsers for network devices.
//!
//! Router and switch "show" commands print semi-tabular free text whose
//! layout is vendor- and version-specific. Each parser module here turns
//! one command's raw output into a validated nested [`Value`] structure
//! that automation can consume without re-parsing text.
//!
//! Every parser is the same machine pointed at different rules: an ordered
//! [`engine::LineRule`] cascade walks the output line by line, handlers
//! build the result incrementally while tracking the current context
//! (active interface, record, table key), and the finished structure is
//! checked against the command's declared [`Schema`] before it is
//! returned.
//!
//! ```
//! use netshow_parsers::iosxe::dmvpn;
//!
//! let output = "\
//! Interface: Tunnel84, IPv4 NHRP Details
//! Type:Spoke, NHRP Peers:1,
//!      1 172.29.0.1          172.30.90.1    UP    6d12h     S
//! ";
//! let parsed = dmvpn::parse(output)?;
//! let tunnel = parsed.get("dmvpn").and_then(|d| d.get("Tunnel84")).unwrap();
//! assert_eq!(tunnel.get("total_peers").and_then(|v| v.as_int()), Some(1));
//! # Ok::<(), netshow_parsers::ParseError>(())
//! ```
//!
//! Parsers never talk to equipment directly. The primary interface is
//! `parse(output)` over pre-captured text; each module also offers a
//! `from_device` variant that formats the exact command string and runs it
//! through a caller-supplied [`Device`] implementation.
//!
//! [`Value`]: netshow_core::Value
//! [`Schema`]: netshow_core::Schema

pub mod device;
pub mod engine;
pub mod error;
pub mod intf;

pub mod iosxe;
pub mod iosxr;
pub mod ironware;
pub mod junos;

pub use device::{Device, DeviceError};
pub use error::ParseError;
