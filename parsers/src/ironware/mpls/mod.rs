//! MPLS parsers for IronWare devices.

pub mod lsp;
pub mod vll;
