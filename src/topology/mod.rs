//! Range topology module.
//!
//! This module contains the machine and role records of a range, the
//! builder that derives them from validated inputs, and the role dependency
//! graph checked before anything is rendered.

pub mod types;
pub mod builder;
pub mod graph;

// Re-export key types and functions for easier access
pub use types::{
    vm_name_for, AttackerHost, AttackerInfo, ChildDomainInfo, DomainDescriptor, DomainMembership,
    DomainRole, MachineSpec, OsProfile, ParentDomainInfo, RedirectorHost, Role, RoleNames, RoleRef,
    StandaloneInfo, VirtualMachine, WindowsProfile, RANGE_ID_PLACEHOLDER,
};
pub use builder::{
    assemble, build_attackers, build_child_domain, build_parent_domain, build_standalone,
    BuildContext, BuildError, Linkage, MachineKind, Topology, TopologyBuilder, KALI_HOSTNAME,
    WIN_ATTACK_HOSTNAME,
};
pub use graph::{DependencyEdge, DependencyGraph, GraphError};
