//! Topology builder.
//!
//! Every machine of a range goes through [`assemble`], driven by a
//! [`MachineKind`] and a [`Linkage`] to the domain(s) it belongs to. The
//! domain-level builders only decide which machines to create and in which
//! order; all derived fields (names, addresses, role edges and role
//! variables) come from `assemble`.
//!
//! Machines are appended to an ordered sequence and never touched again.
//! Role edges only ever point at machines created earlier, which
//! [`TopologyBuilder::finish`] double-checks before a [`Topology`] is handed
//! to the renderer.

use std::collections::{BTreeMap, BTreeSet};

use super::graph::{DependencyGraph, GraphError};
use super::types::{
    vm_name_for, AttackerHost, AttackerInfo, ChildDomainInfo, DomainDescriptor, DomainMembership,
    DomainRole, MachineSpec, OsProfile, ParentDomainInfo, Role, RoleNames, RoleRef, StandaloneInfo,
    VirtualMachine, WindowsProfile, DISABLE_DEFENDER_GPO,
};
use crate::ip::{AddressConflict, AddressRegistry};

/// Hostname of the Linux attack box
pub const KALI_HOSTNAME: &str = "KALI-ATTACK";
/// Hostname of the Windows attack box
pub const WIN_ATTACK_HOSTNAME: &str = "WIN-ATTACK";

/// Errors raised while assembling a topology.
///
/// These point at a bug in the builder or at caller-supplied roles that
/// reference machines which do not exist; user input is validated earlier.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("a {kind:?} machine cannot be placed {placement} (hostname '{hostname}')")]
    InvalidPlacement {
        kind: MachineKind,
        placement: &'static str,
        hostname: String,
    },
    #[error("invalid role graph: {0}")]
    Graph(#[from] GraphError),
    #[error("address conflict: {0}")]
    Address(#[from] AddressConflict),
}

/// What a machine is within its domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineKind {
    PrimaryDc,
    SecondaryDc,
    Member,
    Standalone,
}

/// Where a machine hangs in the forest
#[derive(Debug, Clone, Copy)]
pub enum Linkage<'a> {
    /// Not part of the forest
    Detached { vlan: u16 },
    /// Part of the forest root domain
    Forest(&'a DomainDescriptor),
    /// Part of a child domain of `parent`
    Child {
        domain: &'a DomainDescriptor,
        parent: &'a DomainDescriptor,
    },
}

impl Linkage<'_> {
    fn describe(&self) -> &'static str {
        match self {
            Linkage::Detached { .. } => "outside the forest",
            Linkage::Forest(_) => "in the forest root",
            Linkage::Child { .. } => "in a child domain",
        }
    }

    fn vlan(&self) -> u16 {
        match self {
            Linkage::Detached { vlan } => *vlan,
            Linkage::Forest(domain) => domain.vlan,
            Linkage::Child { domain, .. } => domain.vlan,
        }
    }
}

/// Settings shared by every machine of one build
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub range_id: String,
    pub full_clone: bool,
    pub roles: RoleNames,
    /// Attach the `disable_defender` GPO to the forest root DC
    pub disable_defender_gpo: bool,
}

impl BuildContext {
    pub fn new(range_id: impl Into<String>) -> Self {
        Self {
            range_id: range_id.into(),
            full_clone: false,
            roles: RoleNames::default(),
            disable_defender_gpo: true,
        }
    }
}

fn membership(domain: &DomainDescriptor, role: DomainRole) -> Option<DomainMembership> {
    Some(DomainMembership {
        fqdn: domain.fqdn.clone(),
        role,
    })
}

fn vars(entries: [(&str, String); 3]) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Assemble a single machine record.
///
/// Derives the VM name, domain tag, OS marker, roles with their dependency
/// edges and role variables from the kind/linkage pair. Addresses of the
/// DCs referenced in role variables are computed here from the descriptors.
pub fn assemble(
    ctx: &BuildContext,
    kind: MachineKind,
    linkage: Linkage<'_>,
    spec: &MachineSpec,
) -> Result<VirtualMachine, BuildError> {
    let names = &ctx.roles;

    let (domain, os, roles, role_vars) = match (kind, linkage) {
        (MachineKind::PrimaryDc, Linkage::Forest(root)) => {
            let gpos = if ctx.disable_defender_gpo {
                vec![DISABLE_DEFENDER_GPO.to_string()]
            } else {
                Vec::new()
            };
            (
                membership(root, DomainRole::PrimaryDc),
                OsProfile::Windows(WindowsProfile { sysprep: true, gpos }),
                vec![Role::named(&names.verify_dc_ready)],
                BTreeMap::new(),
            )
        }
        (MachineKind::SecondaryDc, Linkage::Forest(root)) => (
            membership(root, DomainRole::AltDc),
            OsProfile::windows(),
            Vec::new(),
            BTreeMap::new(),
        ),
        (MachineKind::PrimaryDc, Linkage::Child { domain, parent }) => (
            None,
            OsProfile::windows(),
            vec![Role::depending_on(
                &names.create_child_domain,
                RoleRef::new(parent.primary_vm_name(), &names.verify_dc_ready),
            )],
            vars([
                ("dns_domain_name", domain.fqdn.clone()),
                ("parent_domain_netbios_name", parent.netbios.clone()),
                ("parent_dc_ip", parent.primary_address()),
            ]),
        ),
        (MachineKind::SecondaryDc, Linkage::Child { domain, parent }) => (
            None,
            OsProfile::windows(),
            vec![Role::depending_on(
                &names.secondary_child_dc,
                RoleRef::new(domain.primary_vm_name(), &names.create_child_domain),
            )],
            vars([
                ("dns_domain_name", domain.fqdn.clone()),
                ("parent_domain_netbios_name", parent.netbios.clone()),
                ("existing_dc_ip", domain.primary_address()),
            ]),
        ),
        (MachineKind::Member, Linkage::Child { domain, .. }) => (
            None,
            OsProfile::windows(),
            vec![Role::depending_on(
                &names.join_child_domain,
                RoleRef::new(domain.primary_vm_name(), &names.create_child_domain),
            )],
            vars([
                ("dc_ip", domain.primary_address()),
                ("dns_domain_name", domain.fqdn.clone()),
                ("child_domain_netbios_name", domain.netbios.clone()),
            ]),
        ),
        (MachineKind::Standalone, Linkage::Detached { .. }) => (
            None,
            OsProfile::for_template(&spec.template),
            Vec::new(),
            BTreeMap::new(),
        ),
        (kind, linkage) => {
            return Err(BuildError::InvalidPlacement {
                kind,
                placement: linkage.describe(),
                hostname: spec.hostname.clone(),
            })
        }
    };

    Ok(VirtualMachine {
        vm_name: vm_name_for(&spec.hostname),
        hostname: spec.hostname.clone(),
        template: spec.template.clone(),
        vlan: linkage.vlan(),
        ip_last_octet: spec.ip_last_octet,
        ram_gb: spec.ram_gb,
        cpus: spec.cpus,
        full_clone: Some(ctx.full_clone),
        domain,
        os,
        roles,
        role_vars,
    })
}

/// Build the forest root: its primary DC followed by any secondary DCs
pub fn build_parent_domain(
    ctx: &BuildContext,
    info: &ParentDomainInfo,
) -> Result<(Vec<VirtualMachine>, DomainDescriptor), BuildError> {
    let descriptor = DomainDescriptor {
        fqdn: info.fqdn.clone(),
        netbios: info.netbios.clone(),
        vlan: info.vlan,
        primary_ip_octet: info.primary_dc.ip_last_octet,
        primary_hostname: info.primary_dc.hostname.clone(),
    };
    let linkage = Linkage::Forest(&descriptor);

    let mut vms = Vec::with_capacity(1 + info.secondary_dcs.len());
    vms.push(assemble(ctx, MachineKind::PrimaryDc, linkage, &info.primary_dc)?);
    for spec in &info.secondary_dcs {
        vms.push(assemble(ctx, MachineKind::SecondaryDc, linkage, spec)?);
    }

    log::info!(
        "Built forest root {} ({}) on VLAN {} with {} domain controller(s) for range {}",
        descriptor.fqdn,
        descriptor.netbios,
        descriptor.vlan,
        vms.len(),
        ctx.range_id
    );
    Ok((vms, descriptor))
}

/// Build one child domain below `parent`.
///
/// An empty child name skips this child and yields no machines.
pub fn build_child_domain(
    ctx: &BuildContext,
    parent: &DomainDescriptor,
    info: &ChildDomainInfo,
) -> Result<Vec<VirtualMachine>, BuildError> {
    if info.name.trim().is_empty() {
        log::warn!("Child domain without a name below {}; skipping it", parent.fqdn);
        return Ok(Vec::new());
    }

    let descriptor = DomainDescriptor {
        fqdn: format!("{}.{}", info.name.to_lowercase(), parent.fqdn),
        netbios: info.netbios.clone(),
        vlan: info.vlan,
        primary_ip_octet: info.primary_dc.ip_last_octet,
        primary_hostname: info.primary_dc.hostname.clone(),
    };
    let linkage = Linkage::Child {
        domain: &descriptor,
        parent,
    };

    let mut vms = Vec::with_capacity(1 + info.secondary_dcs.len() + info.members.len());
    vms.push(assemble(ctx, MachineKind::PrimaryDc, linkage, &info.primary_dc)?);
    for spec in &info.secondary_dcs {
        vms.push(assemble(ctx, MachineKind::SecondaryDc, linkage, spec)?);
    }
    for spec in &info.members {
        vms.push(assemble(ctx, MachineKind::Member, linkage, spec)?);
    }

    log::info!(
        "Built child domain {} on VLAN {}: {} DC(s), {} member(s)",
        descriptor.fqdn,
        descriptor.vlan,
        1 + info.secondary_dcs.len(),
        info.members.len()
    );
    Ok(vms)
}

/// Build a machine outside the forest
pub fn build_standalone(ctx: &BuildContext, info: &StandaloneInfo) -> Result<VirtualMachine, BuildError> {
    let mut vm = assemble(
        ctx,
        MachineKind::Standalone,
        Linkage::Detached { vlan: info.vlan },
        &info.machine,
    )?;
    vm.domain = info.domain.clone();
    vm.roles = info.roles.clone();
    log::debug!("Built standalone machine {} at {}", vm.vm_name, vm.address());
    Ok(vm)
}

fn attacker_machine(hostname: String, ip_last_octet: u16, host: &AttackerHost) -> MachineSpec {
    MachineSpec {
        hostname,
        template: host.template.clone(),
        ip_last_octet,
        ram_gb: host.ram_gb,
        cpus: host.cpus,
    }
}

/// Build the attacker infrastructure.
///
/// Fixed layout on the attacker VLAN: Kali at .10, the Windows attack box at
/// .20, team server `i` at `100*i` and redirector `i` at `10+i`.
pub fn build_attackers(ctx: &BuildContext, info: &AttackerInfo) -> Result<Vec<VirtualMachine>, BuildError> {
    let mut hosts = vec![
        StandaloneInfo {
            machine: attacker_machine(KALI_HOSTNAME.to_string(), 10, &info.kali),
            vlan: info.vlan,
            domain: None,
            roles: Vec::new(),
        },
        StandaloneInfo {
            machine: attacker_machine(WIN_ATTACK_HOSTNAME.to_string(), 20, &info.windows),
            vlan: info.vlan,
            domain: None,
            roles: Vec::new(),
        },
    ];

    for (i, host) in info.teamservers.iter().enumerate() {
        let n = i as u16 + 1;
        hosts.push(StandaloneInfo {
            machine: attacker_machine(format!("TEAMSERVER{}", n), 100 * n, host),
            vlan: info.vlan,
            domain: None,
            roles: Vec::new(),
        });
    }

    for (i, redirector) in info.redirectors.iter().enumerate() {
        let n = i as u16 + 1;
        hosts.push(StandaloneInfo {
            machine: attacker_machine(format!("REDIRECTOR{}", n), 10 + n, &redirector.host),
            vlan: info.vlan,
            domain: Some(DomainMembership {
                fqdn: redirector.fqdn.clone(),
                role: DomainRole::Redirector,
            }),
            roles: Vec::new(),
        });
    }

    let vms = hosts
        .iter()
        .map(|host| build_standalone(ctx, host))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Built {} attacker machine(s) on VLAN {}", vms.len(), info.vlan);
    Ok(vms)
}

/// A finished, validated range topology
#[derive(Debug, Clone)]
pub struct Topology {
    range_id: String,
    machines: Vec<VirtualMachine>,
    graph: DependencyGraph,
}

impl Topology {
    pub fn range_id(&self) -> &str {
        &self.range_id
    }

    /// Machines in construction order
    pub fn machines(&self) -> &[VirtualMachine] {
        &self.machines
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Distinct role names referenced by the topology
    pub fn role_names(&self) -> BTreeSet<&str> {
        self.machines
            .iter()
            .flat_map(|vm| vm.roles.iter())
            .flat_map(|role| {
                std::iter::once(role.name.as_str())
                    .chain(role.depends_on.iter().map(|dep| dep.role.as_str()))
            })
            .collect()
    }
}

/// Accumulates machines in construction order
#[derive(Debug)]
pub struct TopologyBuilder {
    ctx: BuildContext,
    machines: Vec<VirtualMachine>,
}

impl TopologyBuilder {
    pub fn new(ctx: BuildContext) -> Self {
        Self {
            ctx,
            machines: Vec::new(),
        }
    }

    pub fn parent_domain(&mut self, info: &ParentDomainInfo) -> Result<DomainDescriptor, BuildError> {
        let (vms, descriptor) = build_parent_domain(&self.ctx, info)?;
        self.machines.extend(vms);
        Ok(descriptor)
    }

    /// Returns the number of machines added
    pub fn child_domain(&mut self, parent: &DomainDescriptor, info: &ChildDomainInfo) -> Result<usize, BuildError> {
        let vms = build_child_domain(&self.ctx, parent, info)?;
        let count = vms.len();
        self.machines.extend(vms);
        Ok(count)
    }

    pub fn standalone(&mut self, info: &StandaloneInfo) -> Result<(), BuildError> {
        let vm = build_standalone(&self.ctx, info)?;
        self.machines.push(vm);
        Ok(())
    }

    /// Returns the number of machines added
    pub fn attackers(&mut self, info: &AttackerInfo) -> Result<usize, BuildError> {
        let vms = build_attackers(&self.ctx, info)?;
        let count = vms.len();
        self.machines.extend(vms);
        Ok(count)
    }

    /// Validate the role graph and address plan and seal the topology
    pub fn finish(self) -> Result<Topology, BuildError> {
        let graph = DependencyGraph::from_machines(&self.machines)?;

        let mut addresses = AddressRegistry::new();
        for vm in &self.machines {
            addresses.register(vm.vlan, vm.ip_last_octet, &vm.hostname)?;
        }

        log::info!(
            "Topology for range {} complete: {} machine(s), {} address(es), {} role edge(s)",
            self.ctx.range_id,
            self.machines.len(),
            addresses.len(),
            graph.edges().len()
        );
        Ok(Topology {
            range_id: self.ctx.range_id,
            machines: self.machines,
            graph,
        })
    }
}
