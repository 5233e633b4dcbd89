//! Range description.
//!
//! A YAML file that collects everything a generation run needs: the range
//! id, the forest root, its child domains, machines outside the forest and
//! optional attacker infrastructure. Omitted values fall back to the same
//! defaults an operator would be offered interactively. The description is
//! validated as a whole before any machine is built, and then resolved into
//! the builder's input types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::render::RangeDefaults;
use crate::topology::{
    vm_name_for, AttackerHost, AttackerInfo, BuildContext, ChildDomainInfo, DomainMembership,
    MachineSpec, ParentDomainInfo, RedirectorHost, Role, RoleNames, RoleRef, StandaloneInfo,
    KALI_HOSTNAME, RANGE_ID_PLACEHOLDER, WIN_ATTACK_HOSTNAME,
};
use crate::utils::validation::{
    validate_fqdn, validate_hostname, validate_netbios, validate_octet, validate_range_id,
    validate_resources, validate_vlan,
};

/// Public domains fronted by the redirectors, in order
pub const DEFAULT_REDIRECTOR_DOMAINS: [&str; 2] = ["jonesphotography.com", "militarydiscounts.com"];
/// Upper bound on team servers and on redirectors
pub const MAX_C2_HOSTS: usize = 2;

/// Range description validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid range configuration: {0}")]
    InvalidRange(String),
    #[error("Invalid domain configuration: {0}")]
    InvalidDomain(String),
    #[error("Invalid machine '{hostname}': {reason}")]
    InvalidMachine { hostname: String, reason: String },
    #[error("Invalid attacker configuration: {0}")]
    InvalidAttackers(String),
    #[error("Template '{template}' used by '{hostname}' is not a built Ludus template")]
    UnknownTemplate { template: String, hostname: String },
}

fn default_true() -> bool {
    true
}

fn default_parent_vlan() -> u16 {
    10
}

fn default_child_vlan() -> u16 {
    20
}

fn default_attacker_vlan() -> u16 {
    99
}

/// Top-level range description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeConfig {
    /// Ludus range id, e.g. "MH"
    pub range_id: String,
    /// Use full clones instead of linked clones
    #[serde(default)]
    pub full_clone: bool,
    /// Prefix of the forest role names, e.g. "ludus_"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_prefix: Option<String>,
    /// Attach the disable_defender GPO to the forest root DC
    #[serde(default = "default_true")]
    pub disable_defender_gpo: bool,
    #[serde(default)]
    pub defaults: RangeDefaults,
    pub parent: ParentDomainConfig,
    #[serde(default)]
    pub children: Vec<ChildDomainConfig>,
    #[serde(default)]
    pub standalone: Vec<StandaloneConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attackers: Option<AttackerConfig>,
}

/// Settings of one domain machine; unset values take the slot defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_last_octet: Option<u16>,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
}

/// Defaults for one machine slot of a domain
struct SlotDefaults {
    hostname: String,
    ip_last_octet: u16,
    ram_gb: u32,
    cpus: u32,
}

impl SlotDefaults {
    fn primary_dc(netbios: &str) -> Self {
        Self {
            hostname: format!("{}-DC1", netbios),
            ip_last_octet: 10,
            ram_gb: 4,
            cpus: 4,
        }
    }

    fn secondary_dc(netbios: &str, index: usize) -> Self {
        Self {
            hostname: format!("{}-DC{}", netbios, index + 2),
            ip_last_octet: 11 + index as u16,
            ram_gb: 4,
            cpus: 2,
        }
    }

    fn member(netbios: &str, index: usize) -> Self {
        Self {
            hostname: format!("{}-WKS{}", netbios, index + 1),
            ip_last_octet: 100 + index as u16,
            ram_gb: 4,
            cpus: 2,
        }
    }
}

impl MachineConfig {
    fn resolve(&self, slot: SlotDefaults) -> MachineSpec {
        MachineSpec {
            hostname: self.hostname.clone().unwrap_or(slot.hostname),
            template: self.template.clone(),
            ip_last_octet: self.ip_last_octet.unwrap_or(slot.ip_last_octet),
            ram_gb: self.ram_gb.unwrap_or(slot.ram_gb),
            cpus: self.cpus.unwrap_or(slot.cpus),
        }
    }
}

/// Forest root domain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentDomainConfig {
    pub fqdn: String,
    /// Defaults to the upper-cased first label of the FQDN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netbios: Option<String>,
    #[serde(default = "default_parent_vlan")]
    pub vlan: u16,
    pub primary_dc: MachineConfig,
    #[serde(default)]
    pub secondary_dcs: Vec<MachineConfig>,
}

impl ParentDomainConfig {
    pub fn netbios(&self) -> String {
        self.netbios.clone().unwrap_or_else(|| {
            self.fqdn
                .split('.')
                .next()
                .unwrap_or_default()
                .to_uppercase()
        })
    }

    pub fn resolve(&self) -> ParentDomainInfo {
        let netbios = self.netbios();
        ParentDomainInfo {
            fqdn: self.fqdn.clone(),
            vlan: self.vlan,
            primary_dc: self.primary_dc.resolve(SlotDefaults::primary_dc(&netbios)),
            secondary_dcs: self
                .secondary_dcs
                .iter()
                .enumerate()
                .map(|(i, dc)| dc.resolve(SlotDefaults::secondary_dc(&netbios, i)))
                .collect(),
            netbios,
        }
    }
}

/// Child domain below the forest root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildDomainConfig {
    /// Short name; the FQDN becomes `<name>.<parent fqdn>`. Empty skips the child.
    #[serde(default)]
    pub name: String,
    /// Defaults to the upper-cased name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netbios: Option<String>,
    #[serde(default = "default_child_vlan")]
    pub vlan: u16,
    pub primary_dc: MachineConfig,
    #[serde(default)]
    pub secondary_dcs: Vec<MachineConfig>,
    #[serde(default)]
    pub members: Vec<MachineConfig>,
}

impl ChildDomainConfig {
    pub fn is_skipped(&self) -> bool {
        self.name.trim().is_empty()
    }

    pub fn netbios(&self) -> String {
        self.netbios.clone().unwrap_or_else(|| self.name.trim().to_uppercase())
    }

    pub fn resolve(&self) -> ChildDomainInfo {
        let netbios = self.netbios();
        ChildDomainInfo {
            name: self.name.trim().to_string(),
            vlan: self.vlan,
            primary_dc: self.primary_dc.resolve(SlotDefaults::primary_dc(&netbios)),
            secondary_dcs: self
                .secondary_dcs
                .iter()
                .enumerate()
                .map(|(i, dc)| dc.resolve(SlotDefaults::secondary_dc(&netbios, i)))
                .collect(),
            members: self
                .members
                .iter()
                .enumerate()
                .map(|(i, member)| member.resolve(SlotDefaults::member(&netbios, i)))
                .collect(),
            netbios,
        }
    }
}

/// Role attached to a standalone machine: a bare name or a full mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleConfig {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        depends_on: Vec<RoleRef>,
        #[serde(default)]
        vars: BTreeMap<String, String>,
    },
}

impl RoleConfig {
    pub fn name(&self) -> &str {
        match self {
            RoleConfig::Name(name) => name,
            RoleConfig::Full { name, .. } => name,
        }
    }

    /// Dependency targets written without the range placeholder are hostnames
    pub fn resolve(&self) -> Role {
        match self {
            RoleConfig::Name(name) => Role::named(name.clone()),
            RoleConfig::Full { name, depends_on, vars } => Role {
                name: name.clone(),
                depends_on: depends_on
                    .iter()
                    .map(|dep| {
                        let vm_name = if dep.vm_name.contains(RANGE_ID_PLACEHOLDER) {
                            dep.vm_name.clone()
                        } else {
                            vm_name_for(&dep.vm_name)
                        };
                        RoleRef::new(vm_name, dep.role.clone())
                    })
                    .collect(),
                vars: vars.clone(),
            },
        }
    }
}

/// Machine outside the forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandaloneConfig {
    pub hostname: String,
    pub vlan: u16,
    pub ip_last_octet: u16,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainMembership>,
    #[serde(default)]
    pub roles: Vec<RoleConfig>,
}

impl StandaloneConfig {
    pub fn resolve(&self) -> StandaloneInfo {
        StandaloneInfo {
            machine: MachineSpec {
                hostname: self.hostname.clone(),
                template: self.template.clone(),
                ip_last_octet: self.ip_last_octet,
                ram_gb: self.ram_gb.unwrap_or(2),
                cpus: self.cpus.unwrap_or(1),
            },
            vlan: self.vlan,
            domain: self.domain.clone(),
            roles: self.roles.iter().map(RoleConfig::resolve).collect(),
        }
    }
}

/// Template and sizing of one attacker host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackerHostConfig {
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ram_gb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<u32>,
}

impl AttackerHostConfig {
    fn resolve(&self) -> AttackerHost {
        AttackerHost {
            template: self.template.clone(),
            ram_gb: self.ram_gb.unwrap_or(2),
            cpus: self.cpus.unwrap_or(2),
        }
    }
}

/// Redirector host; the public domain defaults by position
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectorConfig {
    #[serde(flatten)]
    pub host: AttackerHostConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
}

/// Attacker infrastructure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackerConfig {
    #[serde(default = "default_attacker_vlan")]
    pub vlan: u16,
    pub kali: AttackerHostConfig,
    pub windows: AttackerHostConfig,
    pub teamservers: Vec<AttackerHostConfig>,
    pub redirectors: Vec<RedirectorConfig>,
}

impl AttackerConfig {
    pub fn resolve(&self) -> AttackerInfo {
        AttackerInfo {
            vlan: self.vlan,
            kali: self.kali.resolve(),
            windows: self.windows.resolve(),
            teamservers: self.teamservers.iter().map(AttackerHostConfig::resolve).collect(),
            redirectors: self
                .redirectors
                .iter()
                .enumerate()
                .map(|(i, redirector)| RedirectorHost {
                    host: redirector.host.resolve(),
                    fqdn: redirector
                        .fqdn
                        .clone()
                        .or_else(|| DEFAULT_REDIRECTOR_DOMAINS.get(i).map(|d| d.to_string()))
                        .unwrap_or_default(),
                })
                .collect(),
        }
    }
}

fn check_machine(spec: &MachineSpec, vlan: u16) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidMachine {
        hostname: spec.hostname.clone(),
        reason,
    };
    validate_hostname(&spec.hostname).map_err(invalid)?;
    validate_vlan(vlan).map_err(invalid)?;
    validate_octet(spec.ip_last_octet).map_err(invalid)?;
    validate_resources(spec.ram_gb, spec.cpus).map_err(invalid)?;
    if spec.template.trim().is_empty() {
        return Err(invalid("template cannot be empty".to_string()));
    }
    Ok(())
}

impl RangeConfig {
    /// Settings shared by every machine of the build
    pub fn build_context(&self) -> BuildContext {
        BuildContext {
            range_id: self.range_id.clone(),
            full_clone: self.full_clone,
            roles: RoleNames::with_prefix(self.role_prefix.as_deref().unwrap_or_default()),
            disable_defender_gpo: self.disable_defender_gpo,
        }
    }

    /// Validate the whole description
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_range_id(&self.range_id).map_err(ValidationError::InvalidRange)?;
        if let Some(prefix) = &self.role_prefix {
            if prefix.chars().any(char::is_whitespace) {
                return Err(ValidationError::InvalidRange(format!(
                    "role_prefix '{}' cannot contain whitespace",
                    prefix
                )));
            }
        }

        validate_fqdn(&self.parent.fqdn).map_err(ValidationError::InvalidDomain)?;
        let parent = self.parent.resolve();
        validate_netbios(&parent.netbios).map_err(ValidationError::InvalidDomain)?;
        validate_vlan(parent.vlan).map_err(ValidationError::InvalidDomain)?;
        check_machine(&parent.primary_dc, parent.vlan)?;
        for dc in &parent.secondary_dcs {
            check_machine(dc, parent.vlan)?;
        }

        for child in self.children.iter().filter(|child| !child.is_skipped()) {
            let info = child.resolve();
            let fqdn = format!("{}.{}", info.name.to_lowercase(), self.parent.fqdn);
            validate_fqdn(&fqdn).map_err(ValidationError::InvalidDomain)?;
            validate_netbios(&info.netbios).map_err(ValidationError::InvalidDomain)?;
            validate_vlan(info.vlan).map_err(ValidationError::InvalidDomain)?;
            for spec in std::iter::once(&info.primary_dc)
                .chain(&info.secondary_dcs)
                .chain(&info.members)
            {
                check_machine(spec, info.vlan)?;
            }
        }

        for machine in &self.standalone {
            let info = machine.resolve();
            check_machine(&info.machine, info.vlan)?;
            if let Some(domain) = &info.domain {
                validate_fqdn(&domain.fqdn).map_err(ValidationError::InvalidDomain)?;
            }
            if let Some(role) = machine.roles.iter().find(|role| role.name().trim().is_empty()) {
                return Err(ValidationError::InvalidMachine {
                    hostname: machine.hostname.clone(),
                    reason: format!("role names cannot be empty ({:?})", role),
                });
            }
        }

        if let Some(attackers) = &self.attackers {
            self.validate_attackers(attackers)?;
        }

        Ok(())
    }

    fn validate_attackers(&self, attackers: &AttackerConfig) -> Result<(), ValidationError> {
        validate_vlan(attackers.vlan).map_err(ValidationError::InvalidAttackers)?;
        let counts = [
            ("teamservers", attackers.teamservers.len()),
            ("redirectors", attackers.redirectors.len()),
        ];
        for (what, count) in counts {
            if !(1..=MAX_C2_HOSTS).contains(&count) {
                return Err(ValidationError::InvalidAttackers(format!(
                    "{} must list 1-{} hosts, found {}",
                    what, MAX_C2_HOSTS, count
                )));
            }
        }

        let info = attackers.resolve();
        for host in std::iter::once(&info.kali)
            .chain(std::iter::once(&info.windows))
            .chain(&info.teamservers)
            .chain(info.redirectors.iter().map(|r| &r.host))
        {
            if host.template.trim().is_empty() {
                return Err(ValidationError::InvalidAttackers(
                    "template cannot be empty".to_string(),
                ));
            }
            validate_resources(host.ram_gb, host.cpus).map_err(ValidationError::InvalidAttackers)?;
        }
        for redirector in &info.redirectors {
            validate_fqdn(&redirector.fqdn).map_err(ValidationError::InvalidAttackers)?;
        }
        Ok(())
    }

    /// Every (hostname, template) pair of the description, in build order
    pub fn machine_templates(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let parent = self.parent.resolve();
        for spec in std::iter::once(&parent.primary_dc).chain(&parent.secondary_dcs) {
            pairs.push((spec.hostname.clone(), spec.template.clone()));
        }
        for child in self.children.iter().filter(|child| !child.is_skipped()) {
            let info = child.resolve();
            for spec in std::iter::once(&info.primary_dc)
                .chain(&info.secondary_dcs)
                .chain(&info.members)
            {
                pairs.push((spec.hostname.clone(), spec.template.clone()));
            }
        }
        for machine in &self.standalone {
            pairs.push((machine.hostname.clone(), machine.template.clone()));
        }
        if let Some(attackers) = &self.attackers {
            pairs.push((KALI_HOSTNAME.to_string(), attackers.kali.template.clone()));
            pairs.push((WIN_ATTACK_HOSTNAME.to_string(), attackers.windows.template.clone()));
            for (i, host) in attackers.teamservers.iter().enumerate() {
                pairs.push((format!("TEAMSERVER{}", i + 1), host.template.clone()));
            }
            for (i, redirector) in attackers.redirectors.iter().enumerate() {
                pairs.push((format!("REDIRECTOR{}", i + 1), redirector.host.template.clone()));
            }
        }
        pairs
    }

    /// Distinct templates used by the description
    pub fn templates(&self) -> BTreeSet<String> {
        self.machine_templates()
            .into_iter()
            .map(|(_, template)| template)
            .collect()
    }

    /// Check every template against the built templates Ludus reports
    pub fn check_templates(&self, available: &[String]) -> Result<(), ValidationError> {
        for (hostname, template) in self.machine_templates() {
            if !available.iter().any(|t| t == &template) {
                return Err(ValidationError::UnknownTemplate { template, hostname });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
range_id: MH
parent:
  fqdn: ershon.local
  primary_dc:
    template: win2019-server-x64-template
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.full_clone);
        assert!(config.disable_defender_gpo);
        assert_eq!(config.defaults, RangeDefaults::default());

        let parent = config.parent.resolve();
        assert_eq!(parent.netbios, "ERSHON");
        assert_eq!(parent.vlan, 10);
        assert_eq!(parent.primary_dc.hostname, "ERSHON-DC1");
        assert_eq!(parent.primary_dc.ip_last_octet, 10);
        assert_eq!((parent.primary_dc.ram_gb, parent.primary_dc.cpus), (4, 4));
    }

    #[test]
    fn test_child_slot_defaults() {
        let yaml = r#"
name: springfield
primary_dc: { template: win2019 }
secondary_dcs:
  - template: win2019
members:
  - template: win10
  - template: win10
    hostname: LISA
"#;
        let child: ChildDomainConfig = serde_yaml::from_str(yaml).unwrap();
        let info = child.resolve();
        assert_eq!(info.netbios, "SPRINGFIELD");
        assert_eq!(info.vlan, 20);
        assert_eq!(info.primary_dc.hostname, "SPRINGFIELD-DC1");
        assert_eq!(info.secondary_dcs[0].hostname, "SPRINGFIELD-DC2");
        assert_eq!(info.secondary_dcs[0].ip_last_octet, 11);
        assert_eq!(info.members[0].hostname, "SPRINGFIELD-WKS1");
        assert_eq!(info.members[0].ip_last_octet, 100);
        assert_eq!(info.members[1].hostname, "LISA");
        assert_eq!(info.members[1].ip_last_octet, 101);
    }

    #[test]
    fn test_child_name_is_trimmed_everywhere() {
        let mut config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.children.push(
            serde_yaml::from_str("name: ' springfield '\nprimary_dc: { template: win2019 }").unwrap(),
        );
        let info = config.children[0].resolve();
        assert_eq!(info.name, "springfield");
        assert_eq!(info.netbios, "SPRINGFIELD");
        assert_eq!(info.primary_dc.hostname, "SPRINGFIELD-DC1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_child_name_is_not_an_error() {
        let mut config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.children.push(serde_yaml::from_str("primary_dc: { template: win2019 }").unwrap());
        assert!(config.children[0].is_skipped());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_octet_is_rejected() {
        let mut config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.parent.primary_dc.ip_last_octet = Some(255);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidMachine { ref hostname, .. } if hostname == "ERSHON-DC1"));
    }

    #[test]
    fn test_bad_fqdn_and_range_id_are_rejected() {
        let mut config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.parent.fqdn = "ershon".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidDomain(_))));

        let mut config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.range_id = "M H".to_string();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidRange(_))));
    }

    #[test]
    fn test_role_config_resolves_hostnames() {
        let yaml = r#"
- install_tools
- name: join_later
  depends_on:
    - vm_name: ERSHON-DC1
      role: verify_dc_ready
    - vm_name: "{{ range_id }}-FILESRV"
      role: share_setup
  vars:
    share: data
"#;
        let roles: Vec<RoleConfig> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(roles[0].resolve(), Role::named("install_tools"));
        let full = roles[1].resolve();
        assert_eq!(full.depends_on[0].vm_name, "{{ range_id }}-ERSHON-DC1");
        assert_eq!(full.depends_on[1].vm_name, "{{ range_id }}-FILESRV");
        assert_eq!(full.vars["share"], "data");
    }

    #[test]
    fn test_attacker_defaults_and_limits() {
        let yaml = r#"
kali: { template: kali-x64-desktop-template }
windows: { template: win11-22h2-x64-enterprise-template }
teamservers:
  - template: debian-12-x64-server-template
redirectors:
  - template: debian-12-x64-server-template
  - template: debian-12-x64-server-template
    fqdn: example.org
"#;
        let attackers: AttackerConfig = serde_yaml::from_str(yaml).unwrap();
        let info = attackers.resolve();
        assert_eq!(info.vlan, 99);
        assert_eq!(info.redirectors[0].fqdn, "jonesphotography.com");
        assert_eq!(info.redirectors[1].fqdn, "example.org");
        assert_eq!((info.kali.ram_gb, info.kali.cpus), (2, 2));

        let mut config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        let mut too_many = attackers.clone();
        too_many.teamservers = vec![attackers.teamservers[0].clone(); 3];
        config.attackers = Some(too_many);
        assert!(matches!(config.validate(), Err(ValidationError::InvalidAttackers(_))));

        config.attackers = Some(attackers);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_template_catalog_check() {
        let config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        assert!(config
            .check_templates(&["win2019-server-x64-template".to_string()])
            .is_ok());
        let err = config.check_templates(&["debian-12".to_string()]).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownTemplate { ref hostname, .. } if hostname == "ERSHON-DC1"));
    }

    #[test]
    fn test_role_prefix_reaches_context() {
        let mut config: RangeConfig = serde_yaml::from_str(MINIMAL).unwrap();
        config.role_prefix = Some("ludus_".to_string());
        assert_eq!(config.build_context().roles.verify_dc_ready, "ludus_verify_dc_ready");
    }
}
