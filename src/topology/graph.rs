//! Role dependency graph.
//!
//! Nodes are `(vm_name, role)` pairs, edges are the `depends_on` entries the
//! builder attached. The graph is never walked here; Ludus orders execution.
//! What we do guarantee is that every edge points at a role of a machine
//! emitted earlier in the sequence, which also makes the graph acyclic.

use std::collections::HashSet;

use super::types::{RoleRef, VirtualMachine};

/// Structural defects found while validating the role graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("role '{role}' on '{vm_name}' depends on '{target_role}' of '{target_vm}', which no earlier machine provides")]
    DanglingEdge {
        vm_name: String,
        role: String,
        target_vm: String,
        target_role: String,
    },
    #[error("machine name '{0}' is used more than once")]
    DuplicateMachine(String),
}

/// A dependency edge: `from` runs after `to`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub from: RoleRef,
    pub to: RoleRef,
}

/// Validated role dependency graph of a range
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<RoleRef>,
    edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    /// Build and validate the graph from an ordered machine sequence
    pub fn from_machines(machines: &[VirtualMachine]) -> Result<Self, GraphError> {
        let mut seen_machines = HashSet::new();
        let mut available: HashSet<RoleRef> = HashSet::new();
        let mut graph = DependencyGraph::default();

        for vm in machines {
            if !seen_machines.insert(vm.vm_name.as_str()) {
                return Err(GraphError::DuplicateMachine(vm.vm_name.clone()));
            }

            for role in &vm.roles {
                for target in &role.depends_on {
                    if !available.contains(target) {
                        return Err(GraphError::DanglingEdge {
                            vm_name: vm.vm_name.clone(),
                            role: role.name.clone(),
                            target_vm: target.vm_name.clone(),
                            target_role: target.role.clone(),
                        });
                    }
                    graph.edges.push(DependencyEdge {
                        from: RoleRef::new(vm.vm_name.clone(), role.name.clone()),
                        to: target.clone(),
                    });
                }
            }

            // Roles of this machine only become targets for later machines
            for node in vm.role_refs() {
                available.insert(node.clone());
                graph.nodes.push(node);
            }
        }

        log::debug!(
            "Validated role graph: {} roles, {} dependency edges",
            graph.nodes.len(),
            graph.edges.len()
        );
        Ok(graph)
    }

    pub fn nodes(&self) -> &[RoleRef] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::types::{vm_name_for, OsProfile, Role};
    use std::collections::BTreeMap;

    fn machine(hostname: &str, roles: Vec<Role>) -> VirtualMachine {
        VirtualMachine {
            vm_name: vm_name_for(hostname),
            hostname: hostname.to_string(),
            template: "win2019-server-x64-template".to_string(),
            vlan: 10,
            ip_last_octet: 10,
            ram_gb: 4,
            cpus: 2,
            full_clone: None,
            domain: None,
            os: OsProfile::windows(),
            roles,
            role_vars: BTreeMap::new(),
        }
    }

    #[test]
    fn test_backward_edges_are_accepted() {
        let root = machine("ROOT-DC1", vec![Role::named("verify_dc_ready")]);
        let child = machine(
            "CHILD-DC1",
            vec![Role::depending_on(
                "create_child_domain",
                RoleRef::new(vm_name_for("ROOT-DC1"), "verify_dc_ready"),
            )],
        );

        let graph = DependencyGraph::from_machines(&[root, child]).unwrap();
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.edges().len(), 1);

        assert_eq!(
            graph.edges()[0],
            DependencyEdge {
                from: RoleRef::new(vm_name_for("CHILD-DC1"), "create_child_domain"),
                to: RoleRef::new(vm_name_for("ROOT-DC1"), "verify_dc_ready"),
            }
        );
    }

    #[test]
    fn test_forward_edge_is_rejected() {
        let child = machine(
            "CHILD-DC1",
            vec![Role::depending_on(
                "create_child_domain",
                RoleRef::new(vm_name_for("ROOT-DC1"), "verify_dc_ready"),
            )],
        );
        let root = machine("ROOT-DC1", vec![Role::named("verify_dc_ready")]);

        let err = DependencyGraph::from_machines(&[child, root]).unwrap_err();
        assert!(matches!(err, GraphError::DanglingEdge { ref target_vm, .. } if target_vm == "{{ range_id }}-ROOT-DC1"));
    }

    #[test]
    fn test_edge_to_missing_role_is_rejected() {
        let root = machine("ROOT-DC1", vec![]);
        let child = machine(
            "CHILD-DC1",
            vec![Role::depending_on(
                "create_child_domain",
                RoleRef::new(vm_name_for("ROOT-DC1"), "verify_dc_ready"),
            )],
        );
        assert!(DependencyGraph::from_machines(&[root, child]).is_err());
    }

    #[test]
    fn test_edge_within_same_machine_is_rejected() {
        let mut second = Role::named("second");
        second.depends_on.push(RoleRef::new(vm_name_for("SOLO"), "first"));
        let solo = machine("SOLO", vec![Role::named("first"), second]);
        assert!(DependencyGraph::from_machines(&[solo]).is_err());
    }

    #[test]
    fn test_duplicate_machine_is_rejected() {
        let a = machine("WKS1", vec![]);
        let b = machine("WKS1", vec![]);
        assert_eq!(
            DependencyGraph::from_machines(&[a, b]).unwrap_err(),
            GraphError::DuplicateMachine("{{ range_id }}-WKS1".to_string())
        );
    }
}
