//! Input validation utilities.
//!
//! This module provides the checks applied to a range description before
//! anything is built: name syntax for hosts, domains and the range id, and
//! the numeric ranges of VLANs, host octets and machine sizing.

use regex::Regex;
use std::sync::LazyLock;

/// Compiled patterns for name validation
pub struct NamePatterns {
    /// DNS label: letters, digits and inner hyphens, at most 63 characters
    pub hostname: Regex,
    /// NetBIOS domain name: at most 15 characters
    pub netbios: Regex,
    /// Ludus range/user id
    pub range_id: Regex,
}

impl NamePatterns {
    pub fn new() -> Self {
        Self {
            hostname: Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$")
                .expect("Invalid hostname regex"),
            netbios: Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,13}[A-Za-z0-9])?$")
                .expect("Invalid netbios regex"),
            range_id: Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("Invalid range_id regex"),
        }
    }
}

impl Default for NamePatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<NamePatterns> = LazyLock::new(NamePatterns::new);

/// Lowest usable host octet
pub const MIN_OCTET: u16 = 1;
/// Highest usable host octet
pub const MAX_OCTET: u16 = 254;
/// Highest VLAN that still fits the third address octet
pub const MAX_VLAN: u16 = 255;

/// Validate a machine hostname
///
/// # Examples
/// ```
/// use ludus_forest::utils::validation::validate_hostname;
///
/// assert!(validate_hostname("ERSHON-DC1").is_ok());
/// assert!(validate_hostname("-bad").is_err());
/// assert!(validate_hostname("").is_err());
/// ```
pub fn validate_hostname(hostname: &str) -> Result<(), String> {
    if PATTERNS.hostname.is_match(hostname) {
        Ok(())
    } else {
        Err(format!(
            "invalid hostname '{}' (letters, digits and inner hyphens, at most 63 characters)",
            hostname
        ))
    }
}

/// Validate a NetBIOS domain name
pub fn validate_netbios(netbios: &str) -> Result<(), String> {
    if PATTERNS.netbios.is_match(netbios) {
        Ok(())
    } else {
        Err(format!("invalid NetBIOS name '{}' (at most 15 characters)", netbios))
    }
}

/// Validate a fully qualified domain name: at least two valid labels
///
/// # Examples
/// ```
/// use ludus_forest::utils::validation::validate_fqdn;
///
/// assert!(validate_fqdn("ershon.local").is_ok());
/// assert!(validate_fqdn("springfield.ershon.local").is_ok());
/// assert!(validate_fqdn("ershon").is_err());
/// assert!(validate_fqdn("ershon..local").is_err());
/// ```
pub fn validate_fqdn(fqdn: &str) -> Result<(), String> {
    let labels: Vec<&str> = fqdn.split('.').collect();
    if fqdn.len() > 253 || labels.len() < 2 || labels.iter().any(|label| !PATTERNS.hostname.is_match(label)) {
        return Err(format!("invalid domain name '{}'", fqdn));
    }
    Ok(())
}

/// Validate the range id
pub fn validate_range_id(range_id: &str) -> Result<(), String> {
    if PATTERNS.range_id.is_match(range_id) {
        Ok(())
    } else {
        Err(format!(
            "invalid range id '{}' (1-32 letters, digits, '_' or '-')",
            range_id
        ))
    }
}

/// Validate a VLAN number
pub fn validate_vlan(vlan: u16) -> Result<(), String> {
    if (1..=MAX_VLAN).contains(&vlan) {
        Ok(())
    } else {
        Err(format!("VLAN {} out of valid range (must be 1-{})", vlan, MAX_VLAN))
    }
}

/// Validate the last octet of a host address
pub fn validate_octet(octet: u16) -> Result<(), String> {
    if (MIN_OCTET..=MAX_OCTET).contains(&octet) {
        Ok(())
    } else {
        Err(format!(
            "IP last octet {} out of valid range (must be {}-{})",
            octet, MIN_OCTET, MAX_OCTET
        ))
    }
}

/// Validate machine sizing
pub fn validate_resources(ram_gb: u32, cpus: u32) -> Result<(), String> {
    if ram_gb == 0 {
        return Err("RAM must be at least 1 GB".to_string());
    }
    if cpus == 0 {
        return Err("CPU count must be at least 1".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_length_limit() {
        assert!(validate_hostname(&"A".repeat(63)).is_ok());
        assert!(validate_hostname(&"A".repeat(64)).is_err());
        assert!(validate_hostname("SPRINGFIELD-WKS1").is_ok());
        assert!(validate_hostname("has space").is_err());
    }

    #[test]
    fn test_netbios_length_limit() {
        assert!(validate_netbios("SPRINGFIELD").is_ok());
        assert!(validate_netbios("ABCDEFGHIJKLMNO").is_ok());
        assert!(validate_netbios("ABCDEFGHIJKLMNOP").is_err());
    }

    #[test]
    fn test_range_id() {
        assert!(validate_range_id("MH").is_ok());
        assert!(validate_range_id("team_01").is_ok());
        assert!(validate_range_id("").is_err());
        assert!(validate_range_id("{{ x }}").is_err());
    }

    #[test]
    fn test_numeric_ranges() {
        assert!(validate_vlan(0).is_err());
        assert!(validate_vlan(99).is_ok());
        assert!(validate_vlan(256).is_err());
        assert!(validate_octet(0).is_err());
        assert!(validate_octet(1).is_ok());
        assert!(validate_octet(254).is_ok());
        assert!(validate_octet(255).is_err());
        assert!(validate_resources(4, 2).is_ok());
        assert!(validate_resources(0, 2).is_err());
        assert!(validate_resources(4, 0).is_err());
    }
}
