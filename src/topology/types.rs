//! Topology type definitions.
//!
//! This file contains the records the builder produces (machines, roles,
//! domain memberships) and the already-validated inputs it consumes.
//! Records serialize field-for-field into the `ludus` section of a range
//! config.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ip::assign_address;

/// Placeholder Ludus substitutes with the range id when a config is applied
pub const RANGE_ID_PLACEHOLDER: &str = "{{ range_id }}";

/// Template name fragments that identify a Linux guest
pub const LINUX_TEMPLATE_MARKERS: [&str; 3] = ["linux", "ubuntu", "kali"];

/// GPO that turns off Windows Defender on the forest root DC
pub const DISABLE_DEFENDER_GPO: &str = "disable_defender";

/// Derive the range-scoped VM name for a hostname.
///
/// The range id placeholder is left unresolved for Ludus.
pub fn vm_name_for(hostname: &str) -> String {
    format!("{}-{}", RANGE_ID_PLACEHOLDER, hostname)
}

/// Returns true if the template name looks like a Linux image
pub fn is_linux_template(template: &str) -> bool {
    LINUX_TEMPLATE_MARKERS
        .iter()
        .any(|marker| template.contains(marker))
}

/// Names of the provisioning roles wired together by the builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleNames {
    /// Attached to the forest root DC; completes once the domain answers
    pub verify_dc_ready: String,
    /// Promotes a child domain's primary DC
    pub create_child_domain: String,
    /// Promotes an additional DC into an existing child domain
    pub secondary_child_dc: String,
    /// Joins a workstation or server to a child domain
    pub join_child_domain: String,
}

impl RoleNames {
    /// Role names with `prefix` prepended, e.g. `ludus_` for the published
    /// role packages
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            verify_dc_ready: format!("{}verify_dc_ready", prefix),
            create_child_domain: format!("{}create_child_domain", prefix),
            secondary_child_dc: format!("{}secondary_child_dc", prefix),
            join_child_domain: format!("{}join_child_domain", prefix),
        }
    }
}

impl Default for RoleNames {
    fn default() -> Self {
        Self::with_prefix("")
    }
}

/// Reference to a role attached to another machine
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleRef {
    pub vm_name: String,
    pub role: String,
}

impl RoleRef {
    pub fn new(vm_name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            vm_name: vm_name.into(),
            role: role.into(),
        }
    }
}

/// A provisioning role attached to a machine.
///
/// A role with neither dependencies nor variables serializes as its bare
/// name; otherwise as a `{name, depends_on, vars}` mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub name: String,
    pub depends_on: Vec<RoleRef>,
    pub vars: BTreeMap<String, String>,
}

impl Role {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
            vars: BTreeMap::new(),
        }
    }

    /// Role that must run after `target`
    pub fn depending_on(name: impl Into<String>, target: RoleRef) -> Self {
        Self {
            name: name.into(),
            depends_on: vec![target],
            vars: BTreeMap::new(),
        }
    }

    pub fn is_bare(&self) -> bool {
        self.depends_on.is_empty() && self.vars.is_empty()
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_bare() {
            return serializer.serialize_str(&self.name);
        }
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if !self.depends_on.is_empty() {
            map.serialize_entry("depends_on", &self.depends_on)?;
        }
        if !self.vars.is_empty() {
            map.serialize_entry("vars", &self.vars)?;
        }
        map.end()
    }
}

/// Role a machine plays inside its domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DomainRole {
    PrimaryDc,
    AltDc,
    Member,
    Redirector,
}

/// `domain` block of a machine record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMembership {
    pub fqdn: String,
    pub role: DomainRole,
}

/// `windows` block of a machine record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowsProfile {
    pub sysprep: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gpos: Vec<String>,
}

/// Guest OS marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsProfile {
    Windows(WindowsProfile),
    Linux,
}

impl OsProfile {
    /// Sysprepped Windows guest without GPOs
    pub fn windows() -> Self {
        OsProfile::Windows(WindowsProfile {
            sysprep: true,
            gpos: Vec::new(),
        })
    }

    /// Pick the marker from the template name
    pub fn for_template(template: &str) -> Self {
        if is_linux_template(template) {
            OsProfile::Linux
        } else {
            Self::windows()
        }
    }

    pub fn is_linux(&self) -> bool {
        matches!(self, OsProfile::Linux)
    }
}

/// A machine of the range, as emitted in the `ludus` sequence
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualMachine {
    pub vm_name: String,
    pub hostname: String,
    pub template: String,
    pub vlan: u16,
    pub ip_last_octet: u16,
    pub ram_gb: u32,
    pub cpus: u32,
    pub full_clone: Option<bool>,
    pub domain: Option<DomainMembership>,
    pub os: OsProfile,
    pub roles: Vec<Role>,
    pub role_vars: BTreeMap<String, String>,
}

impl VirtualMachine {
    /// Address of this machine inside the range
    pub fn address(&self) -> String {
        assign_address(self.vlan, self.ip_last_octet)
    }

    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|role| role.name == name)
    }

    /// References to every role attached to this machine
    pub fn role_refs(&self) -> impl Iterator<Item = RoleRef> + '_ {
        self.roles
            .iter()
            .map(move |role| RoleRef::new(self.vm_name.clone(), role.name.clone()))
    }

    /// Returns true if this machine is a domain controller of any kind
    pub fn is_domain_controller(&self) -> bool {
        matches!(
            self.domain.as_ref().map(|d| d.role),
            Some(DomainRole::PrimaryDc) | Some(DomainRole::AltDc)
        )
    }
}

impl Serialize for VirtualMachine {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("vm_name", &self.vm_name)?;
        map.serialize_entry("hostname", &self.hostname)?;
        map.serialize_entry("template", &self.template)?;
        map.serialize_entry("vlan", &self.vlan)?;
        map.serialize_entry("ip_last_octet", &self.ip_last_octet)?;
        map.serialize_entry("ram_gb", &self.ram_gb)?;
        map.serialize_entry("cpus", &self.cpus)?;
        if let Some(full_clone) = self.full_clone {
            map.serialize_entry("full_clone", &full_clone)?;
        }
        if let Some(domain) = &self.domain {
            map.serialize_entry("domain", domain)?;
        }
        match &self.os {
            OsProfile::Windows(profile) => map.serialize_entry("windows", profile)?,
            OsProfile::Linux => map.serialize_entry("linux", &true)?,
        }
        if !self.roles.is_empty() {
            map.serialize_entry("roles", &self.roles)?;
        }
        if !self.role_vars.is_empty() {
            map.serialize_entry("role_vars", &self.role_vars)?;
        }
        map.end()
    }
}

// ============================================================================
// Builder inputs
// ============================================================================

/// Per-machine settings, already validated at the input boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineSpec {
    pub hostname: String,
    pub template: String,
    pub ip_last_octet: u16,
    pub ram_gb: u32,
    pub cpus: u32,
}

/// Forest root domain and its domain controllers
#[derive(Debug, Clone)]
pub struct ParentDomainInfo {
    pub fqdn: String,
    pub netbios: String,
    pub vlan: u16,
    pub primary_dc: MachineSpec,
    pub secondary_dcs: Vec<MachineSpec>,
}

/// Child domain below the forest root.
///
/// An empty `name` makes the builder skip this child entirely.
#[derive(Debug, Clone)]
pub struct ChildDomainInfo {
    pub name: String,
    pub netbios: String,
    pub vlan: u16,
    pub primary_dc: MachineSpec,
    pub secondary_dcs: Vec<MachineSpec>,
    pub members: Vec<MachineSpec>,
}

/// Machine outside the forest
#[derive(Debug, Clone)]
pub struct StandaloneInfo {
    pub machine: MachineSpec,
    pub vlan: u16,
    pub domain: Option<DomainMembership>,
    pub roles: Vec<Role>,
}

/// Template and sizing of one attacker host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackerHost {
    pub template: String,
    pub ram_gb: u32,
    pub cpus: u32,
}

/// Redirector host with the public domain it fronts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectorHost {
    pub host: AttackerHost,
    pub fqdn: String,
}

/// Attacker infrastructure placed on its own VLAN
#[derive(Debug, Clone)]
pub struct AttackerInfo {
    pub vlan: u16,
    pub kali: AttackerHost,
    pub windows: AttackerHost,
    pub teamservers: Vec<AttackerHost>,
    pub redirectors: Vec<RedirectorHost>,
}

/// Summary of a built domain handed to the builders of dependent machines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDescriptor {
    pub fqdn: String,
    pub netbios: String,
    pub vlan: u16,
    pub primary_ip_octet: u16,
    pub primary_hostname: String,
}

impl DomainDescriptor {
    /// VM name of the domain's primary DC
    pub fn primary_vm_name(&self) -> String {
        vm_name_for(&self.primary_hostname)
    }

    /// Address of the domain's primary DC
    pub fn primary_address(&self) -> String {
        assign_address(self.vlan, self.primary_ip_octet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vm() -> VirtualMachine {
        VirtualMachine {
            vm_name: vm_name_for("KALI"),
            hostname: "KALI".to_string(),
            template: "kali-x64-desktop-template".to_string(),
            vlan: 99,
            ip_last_octet: 10,
            ram_gb: 4,
            cpus: 2,
            full_clone: Some(false),
            domain: None,
            os: OsProfile::Linux,
            roles: Vec::new(),
            role_vars: BTreeMap::new(),
        }
    }

    #[test]
    fn test_vm_name_keeps_placeholder() {
        assert_eq!(vm_name_for("ERSHON-DC1"), "{{ range_id }}-ERSHON-DC1");
    }

    #[test]
    fn test_linux_template_detection() {
        assert!(is_linux_template("kali-x64-desktop-template"));
        assert!(is_linux_template("ubuntu-22.04-x64-server-template"));
        assert!(!is_linux_template("win2019-server-x64-template"));
        assert!(OsProfile::for_template("debian-linux-template").is_linux());
    }

    #[test]
    fn test_role_names_prefix() {
        let names = RoleNames::with_prefix("ludus_");
        assert_eq!(names.verify_dc_ready, "ludus_verify_dc_ready");
        assert_eq!(names.join_child_domain, "ludus_join_child_domain");
        assert_eq!(RoleNames::default().create_child_domain, "create_child_domain");
    }

    #[test]
    fn test_bare_role_serializes_as_name() {
        let value = serde_yaml::to_value(Role::named("verify_dc_ready")).unwrap();
        assert_eq!(value, serde_yaml::Value::String("verify_dc_ready".to_string()));
    }

    #[test]
    fn test_role_with_dependency_serializes_as_mapping() {
        let role = Role::depending_on(
            "create_child_domain",
            RoleRef::new(vm_name_for("ERSHON-DC1"), "verify_dc_ready"),
        );
        let value = serde_yaml::to_value(&role).unwrap();
        assert_eq!(value["name"].as_str(), Some("create_child_domain"));
        assert_eq!(
            value["depends_on"][0]["vm_name"].as_str(),
            Some("{{ range_id }}-ERSHON-DC1")
        );
        assert!(value.get("vars").is_none());
    }

    #[test]
    fn test_vm_serialization_field_order() {
        let value = serde_yaml::to_value(sample_vm()).unwrap();
        let keys: Vec<&str> = value
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(
            keys,
            vec!["vm_name", "hostname", "template", "vlan", "ip_last_octet", "ram_gb", "cpus", "full_clone", "linux"]
        );
    }

    #[test]
    fn test_windows_marker_omits_empty_gpos() {
        let mut vm = sample_vm();
        vm.os = OsProfile::windows();
        let value = serde_yaml::to_value(&vm).unwrap();
        assert_eq!(value["windows"]["sysprep"].as_bool(), Some(true));
        assert!(value["windows"].get("gpos").is_none());
        assert!(value.get("linux").is_none());
    }

    #[test]
    fn test_descriptor_derivations() {
        let descriptor = DomainDescriptor {
            fqdn: "ershon.local".to_string(),
            netbios: "ERSHON".to_string(),
            vlan: 10,
            primary_ip_octet: 10,
            primary_hostname: "ERSHON-DC1".to_string(),
        };
        assert_eq!(descriptor.primary_vm_name(), "{{ range_id }}-ERSHON-DC1");
        assert_eq!(descriptor.primary_address(), "10.2.10.10");
    }
}
