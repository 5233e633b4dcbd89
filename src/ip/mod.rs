//! Address allocation and management module.
//!
//! Every range machine lives at `10.2.<vlan>.<octet>`. This module maps the
//! (VLAN, host octet) pair of a machine to its address string and keeps
//! track of which pairs are already taken.

pub mod allocator;
pub mod registry;

// Re-export commonly used types
pub use allocator::{assign_address, RANGE_ADDRESS_PREFIX};
pub use registry::{AddressConflict, AddressRegistry};
