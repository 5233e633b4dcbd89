//! Range manifest.
//!
//! A JSON summary written next to the range documents: every machine with
//! its VM name resolved for this range, its address and roles, plus the
//! role dependency edges. Meant for scripts that need to find machines
//! after deployment without parsing the Ludus YAML.

use serde::Serialize;

use crate::topology::{RoleRef, Topology, RANGE_ID_PLACEHOLDER};

/// One machine of the range
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestMachine {
    /// VM name as written in the range documents
    pub vm_name: String,
    /// VM name with the range placeholder replaced by the range id
    pub resolved_name: String,
    pub hostname: String,
    pub address: String,
    pub domain_controller: bool,
    pub roles: Vec<String>,
}

/// A dependency edge: `from` runs after `to`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestEdge {
    pub from: RoleRef,
    pub to: RoleRef,
}

/// Manifest written as `range-manifest.json`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct RangeManifest {
    pub range_id: String,
    pub machines: Vec<ManifestMachine>,
    pub dependencies: Vec<ManifestEdge>,
}

impl RangeManifest {
    pub fn from_topology(topology: &Topology) -> Self {
        let range_id = topology.range_id();
        let machines = topology
            .machines()
            .iter()
            .map(|vm| ManifestMachine {
                vm_name: vm.vm_name.clone(),
                resolved_name: vm.vm_name.replace(RANGE_ID_PLACEHOLDER, range_id),
                hostname: vm.hostname.clone(),
                address: vm.address(),
                domain_controller: vm.is_domain_controller(),
                roles: vm.roles.iter().map(|role| role.name.clone()).collect(),
            })
            .collect();
        let dependencies = topology
            .graph()
            .edges()
            .iter()
            .map(|edge| ManifestEdge {
                from: edge.from.clone(),
                to: edge.to.clone(),
            })
            .collect();

        Self {
            range_id: range_id.to_string(),
            machines,
            dependencies,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
