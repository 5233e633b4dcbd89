//! Address registry.
//!
//! Tracks which (VLAN, octet) pairs have been handed out so two machines of
//! one range never end up on the same address.

use std::collections::HashMap;

use super::allocator::assign_address;

/// Two machines were placed on the same address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("address {address} of '{machine}' is already assigned to '{existing}'")]
pub struct AddressConflict {
    pub address: String,
    pub machine: String,
    pub existing: String,
}

/// Registry of assigned range addresses
#[derive(Debug, Default)]
pub struct AddressRegistry {
    /// (vlan, octet) -> owning machine
    assigned: HashMap<(u16, u16), String>,
}

impl AddressRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `machine` at (vlan, octet) and return its address string
    pub fn register(&mut self, vlan: u16, octet: u16, machine: &str) -> Result<String, AddressConflict> {
        let address = assign_address(vlan, octet);
        if let Some(existing) = self.assigned.get(&(vlan, octet)) {
            if existing != machine {
                return Err(AddressConflict {
                    address,
                    machine: machine.to_string(),
                    existing: existing.clone(),
                });
            }
            return Ok(address);
        }
        self.assigned.insert((vlan, octet), machine.to_string());
        Ok(address)
    }

    /// Number of assigned addresses
    pub fn len(&self) -> usize {
        self.assigned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assigned.is_empty()
    }
}
