//! Parsers for IOS-XE devices.

pub mod cts;
pub mod dmvpn;
