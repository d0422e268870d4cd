//! Parsers for Junos devices.

pub mod arp;
