//! Interface-name canonicalization.
//!
//! Tabular show output abbreviates interface names (`Gi0/3/0/0`,
//! `Te0/1/0/2`) while detail sections spell them out. Parsers that key
//! records by interface expand the abbreviation so both forms land on the
//! same entry.

/// Expands a leading interface-type abbreviation to its canonical name.
///
/// Unknown prefixes (and names that are already canonical) pass through
/// unchanged.
///
/// # Examples
///
/// ```
/// use netshow_parsers::intf::canonical_interface_name;
///
/// assert_eq!(canonical_interface_name("Gi0/3/0/0"), "GigabitEthernet0/3/0/0");
/// assert_eq!(canonical_interface_name("BE100"), "Bundle-Ether100");
/// assert_eq!(canonical_interface_name("GigabitEthernet0/3/0/0"), "GigabitEthernet0/3/0/0");
/// ```
pub fn canonical_interface_name(name: &str) -> String {
    let split = name
        .char_indices()
        .find(|(_, ch)| !ch.is_ascii_alphabetic() && *ch != '-')
        .map(|(idx, _)| idx)
        .unwrap_or(name.len());
    let (prefix, rest) = name.split_at(split);

    let expanded = match prefix {
        "Eth" => "Ethernet",
        "Fa" => "FastEthernet",
        "Gi" => "GigabitEthernet",
        "Te" => "TenGigE",
        "Tw" => "TwentyFiveGigE",
        "Fo" => "FortyGigE",
        "Hu" => "HundredGigE",
        "BE" => "Bundle-Ether",
        "BV" => "BVI",
        "Lo" => "Loopback",
        "Mg" => "MgmtEth",
        "Nu" => "Null",
        "Po" => "Port-channel",
        "Se" => "Serial",
        "Tu" => "Tunnel",
        "Vl" => "Vlan",
        _ => return name.to_string(),
    };
    format!("{expanded}{rest}")
}
