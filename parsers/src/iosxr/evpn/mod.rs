//! EVPN parsers for IOS-XR devices.

pub mod ethernet_segment;
pub mod evi;
pub mod internal_label;
pub mod mac;
