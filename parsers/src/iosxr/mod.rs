//! Parsers for IOS-XR devices.

pub mod evpn;
