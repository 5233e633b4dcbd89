//! Range address allocation.
//!
//! Ludus places each VLAN of a range in its own /24 under `10.2.0.0/16`.
//! The allocator is a pure function of the VLAN and host octet; it never
//! checks for collisions (see [`super::registry`]) and never validates the
//! octet range, which is the job of the input boundary.

/// First two octets shared by every range address
pub const RANGE_ADDRESS_PREFIX: &str = "10.2";

/// Get the address of a machine on `vlan` with host part `octet`.
///
/// # Examples
/// ```
/// use ludus_forest::ip::assign_address;
///
/// assert_eq!(assign_address(10, 10), "10.2.10.10");
/// assert_eq!(assign_address(99, 100), "10.2.99.100");
/// ```
pub fn assign_address(vlan: u16, octet: u16) -> String {
    format!("{}.{}.{}", RANGE_ADDRESS_PREFIX, vlan, octet)
}
