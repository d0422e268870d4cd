//! Parsers for IronWare devices.

pub mod mpls;
