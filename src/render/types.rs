//! Range config document types.
//!
//! This module contains the top-level sections of a Ludus range config:
//! global defaults, the open network block, the segmented policy block and
//! the two document wrappers around the machine sequence.

use serde::{Deserialize, Serialize};

use crate::topology::VirtualMachine;

// ============================================================================
// Defaults
// ============================================================================

/// Range-wide `defaults` section.
///
/// Every field has a default so a range description may omit the section
/// entirely or override single values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeDefaults {
    pub ad_domain_admin: String,
    pub ad_domain_admin_password: String,
    pub ad_domain_user: String,
    pub ad_domain_user_password: String,
    /// Must satisfy the domain password policy, secondary DCs need it
    pub ad_domain_safe_mode_password: String,
    pub timezone: String,
    pub ad_domain_functional_level: String,
    pub ad_forest_functional_level: String,
    #[serde(rename = "snapshot_with_RAM")]
    pub snapshot_with_ram: bool,
    pub stale_hours: u32,
    pub enable_dynamic_wallpaper: bool,
}

impl Default for RangeDefaults {
    fn default() -> Self {
        Self {
            ad_domain_admin: "domainadmin".to_string(),
            ad_domain_admin_password: "password".to_string(),
            ad_domain_user: "domainuser".to_string(),
            ad_domain_user_password: "password".to_string(),
            ad_domain_safe_mode_password: "YourComplexPassword!1".to_string(),
            timezone: "America/Chicago".to_string(),
            ad_domain_functional_level: "Win2012R2".to_string(),
            ad_forest_functional_level: "Win2012R2".to_string(),
            snapshot_with_ram: true,
            stale_hours: 0,
            enable_dynamic_wallpaper: true,
        }
    }
}

// ============================================================================
// Network sections
// ============================================================================

/// Default verdict for traffic not matched by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrafficPolicy {
    Accept,
}

/// `network` section of the open variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkSettings {
    pub inter_vlan_default: TrafficPolicy,
    pub external_default: TrafficPolicy,
}

impl NetworkSettings {
    /// Everything may talk to everything
    pub fn open() -> Self {
        Self {
            inter_vlan_default: TrafficPolicy::Accept,
            external_default: TrafficPolicy::Accept,
        }
    }
}

/// Allow rule of the segmented variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyRule {
    pub src: String,
    pub dst: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<u16>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trust: Option<bool>,
}

impl PolicyRule {
    pub fn ports(src: &str, dst: &str, ports: &[u16]) -> Self {
        Self {
            src: src.to_string(),
            dst: dst.to_string(),
            ports: Some(ports.to_vec()),
            trust: None,
        }
    }

    pub fn trust(src: &str, dst: &str) -> Self {
        Self {
            src: src.to_string(),
            dst: dst.to_string(),
            ports: None,
            trust: Some(true),
        }
    }
}

/// Ports non-DC machines may use to reach the redirectors
pub const REDIRECTOR_PORTS: [u16; 5] = [80, 443, 53, 8080, 8443];
/// Team server listener port
pub const TEAMSERVER_PORTS: [u16; 1] = [50050];

/// `network_policies` section of the segmented variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkPolicies {
    pub default_isolate_vlans: bool,
    pub allow: Vec<PolicyRule>,
}

impl NetworkPolicies {
    /// Isolated VLANs with the three C2 and trust paths opened
    pub fn segmented() -> Self {
        Self {
            default_isolate_vlans: true,
            allow: vec![
                PolicyRule::ports("non-DC", "redirector", &REDIRECTOR_PORTS),
                PolicyRule::ports("attacker", "teamserver", &TEAMSERVER_PORTS),
                PolicyRule::trust("domain", "domain"),
            ],
        }
    }
}

// ============================================================================
// Documents
// ============================================================================

/// Open variant: permissive network, machines in construction order
#[derive(Debug, Serialize)]
pub struct OpenRangeConfig<'a> {
    pub defaults: &'a RangeDefaults,
    pub network: NetworkSettings,
    pub ludus: &'a [VirtualMachine],
}

/// Segmented variant: same machines behind an allow-list
#[derive(Debug, Serialize)]
pub struct SegmentedRangeConfig<'a> {
    pub defaults: &'a RangeDefaults,
    pub network_policies: NetworkPolicies,
    pub ludus: &'a [VirtualMachine],
}
