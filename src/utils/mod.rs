//! Shared utilities: input validation.

pub mod validation;

pub use validation::{
    validate_fqdn, validate_hostname, validate_netbios, validate_octet, validate_range_id,
    validate_resources, validate_vlan,
};
