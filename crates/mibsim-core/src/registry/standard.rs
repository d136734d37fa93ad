//! Standard/system module recognition.
//!
//! Imports naming these modules are always considered satisfied: the
//! underlying compiler resolves them from its bundled definitions, so they
//! never count as missing dependencies during batch validation.

/// Modules shipped with every SMI toolchain installation.
const STANDARD_MODULES: &[&str] = &[
    "SNMPv2-SMI",
    "SNMPv2-TC",
    "SNMPv2-CONF",
    "SNMPv2-MIB",
    "SNMP-FRAMEWORK-MIB",
    "SNMP-MPD-MIB",
    "SNMP-TARGET-MIB",
    "SNMP-NOTIFICATION-MIB",
    "SNMP-PROXY-MIB",
    "SNMP-USER-BASED-SM-MIB",
    "SNMP-VIEW-BASED-ACM-MIB",
    "SNMP-COMMUNITY-MIB",
    "IANAifType-MIB",
    "IANA-ADDRESS-FAMILY-NUMBERS-MIB",
    "INET-ADDRESS-MIB",
    "IF-MIB",
    "IP-MIB",
    "TCP-MIB",
    "UDP-MIB",
    "HOST-RESOURCES-MIB",
    "ENTITY-MIB",
    "BRIDGE-MIB",
    "RFC1155-SMI",
    "RFC1213-MIB",
    "RFC-1215",
];

/// Check if a module name is on the standard allowlist. Case-sensitive.
#[must_use]
pub fn is_standard_module(name: &str) -> bool {
    STANDARD_MODULES.contains(&name)
}

/// Iterate all standard module names.
pub fn standard_modules() -> impl Iterator<Item = &'static str> {
    STANDARD_MODULES.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_standards() {
        assert!(is_standard_module("SNMPv2-SMI"));
        assert!(is_standard_module("IF-MIB"));
        assert!(is_standard_module("RFC-1215"));
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!is_standard_module("snmpv2-smi"));
        assert!(!is_standard_module("VENDOR-MIB"));
    }

    #[test]
    fn test_allowlist_size() {
        assert_eq!(standard_modules().count(), 25);
    }
}
