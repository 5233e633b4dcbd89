//! # Range Config Rendering Module
//!
//! This module turns a finished [`Topology`] into the YAML documents Ludus
//! consumes. Two variants are produced from the same machine sequence:
//!
//! - **Open**: `defaults`, a permissive `network` block and `ludus`
//! - **Segmented**: `defaults`, an isolating `network_policies` block with
//!   three allow rules, and the very same `ludus` section
//!
//! ## Example Generated Structure
//!
//! ```yaml
//! defaults:
//!   ad_domain_admin: domainadmin
//!   snapshot_with_RAM: true
//! network:
//!   inter_vlan_default: ACCEPT
//!   external_default: ACCEPT
//! ludus:
//! - vm_name: '{{ range_id }}-ERSHON-DC1'
//!   hostname: ERSHON-DC1
//!   domain:
//!     fqdn: ershon.local
//!     role: primary-dc
//!   roles:
//!   - verify_dc_ready
//! ```
//!
//! Rendering is a pure read of the topology: the same topology always
//! yields byte-identical documents.

pub mod emitter;
pub mod types;

use serde::Serialize;

use crate::topology::Topology;

pub use emitter::{emit_string, is_placeholder, to_yaml_string, RenderError};
pub use types::{
    NetworkPolicies, NetworkSettings, OpenRangeConfig, PolicyRule, RangeDefaults,
    SegmentedRangeConfig, TrafficPolicy, REDIRECTOR_PORTS, TEAMSERVER_PORTS,
};

/// Both variants of a rendered range config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRange {
    pub open: String,
    pub segmented: String,
}

/// Render any serializable document with placeholder-aware quoting
pub fn render_document<T: Serialize>(document: &T) -> Result<String, RenderError> {
    let value = serde_yaml::to_value(document)?;
    to_yaml_string(&value)
}

/// Render the open variant
pub fn render_open(topology: &Topology, defaults: &RangeDefaults) -> Result<String, RenderError> {
    render_document(&OpenRangeConfig {
        defaults,
        network: NetworkSettings::open(),
        ludus: topology.machines(),
    })
}

/// Render the segmented variant
pub fn render_segmented(topology: &Topology, defaults: &RangeDefaults) -> Result<String, RenderError> {
    render_document(&SegmentedRangeConfig {
        defaults,
        network_policies: NetworkPolicies::segmented(),
        ludus: topology.machines(),
    })
}

/// Render both variants
pub fn render_range(topology: &Topology, defaults: &RangeDefaults) -> Result<RenderedRange, RenderError> {
    let rendered = RenderedRange {
        open: render_open(topology, defaults)?,
        segmented: render_segmented(topology, defaults)?,
    };
    log::debug!(
        "Rendered range {}: open {} bytes, segmented {} bytes",
        topology.range_id(),
        rendered.open.len(),
        rendered.segmented.len()
    );
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::{BuildContext, MachineSpec, ParentDomainInfo, TopologyBuilder};
    use serde_yaml::Value;

    fn topology() -> Topology {
        let mut builder = TopologyBuilder::new(BuildContext::new("MH"));
        builder
            .parent_domain(&ParentDomainInfo {
                fqdn: "ershon.local".to_string(),
                netbios: "ERSHON".to_string(),
                vlan: 10,
                primary_dc: MachineSpec {
                    hostname: "ERSHON-DC1".to_string(),
                    template: "win2019-server-x64-template".to_string(),
                    ip_last_octet: 10,
                    ram_gb: 4,
                    cpus: 4,
                },
                secondary_dcs: Vec::new(),
            })
            .unwrap();
        builder.finish().unwrap()
    }

    #[test]
    fn test_open_document_sections() {
        let yaml = render_open(&topology(), &RangeDefaults::default()).unwrap();
        let value: Value = serde_yaml::from_str(&yaml).unwrap();
        let keys: Vec<&str> = value.as_mapping().unwrap().keys().map(|k| k.as_str().unwrap()).collect();
        assert_eq!(keys, vec!["defaults", "network", "ludus"]);
        assert_eq!(value["network"]["inter_vlan_default"].as_str(), Some("ACCEPT"));
        assert_eq!(value["network"]["external_default"].as_str(), Some("ACCEPT"));
        assert_eq!(value["defaults"]["snapshot_with_RAM"].as_bool(), Some(true));
        assert_eq!(value["defaults"]["stale_hours"].as_u64(), Some(0));
    }

    #[test]
    fn test_segmented_document_policies() {
        let yaml = render_segmented(&topology(), &RangeDefaults::default()).unwrap();
        let value: Value = serde_yaml::from_str(&yaml).unwrap();
        assert!(value.get("network").is_none());
        let policies = &value["network_policies"];
        assert_eq!(policies["default_isolate_vlans"].as_bool(), Some(true));
        let allow = policies["allow"].as_sequence().unwrap();
        assert_eq!(allow.len(), 3);
        assert_eq!(allow[0]["src"].as_str(), Some("non-DC"));
        assert_eq!(allow[0]["dst"].as_str(), Some("redirector"));
        let ports: Vec<u64> = allow[0]["ports"].as_sequence().unwrap().iter().filter_map(Value::as_u64).collect();
        assert_eq!(ports, vec![80, 443, 53, 8080, 8443]);
        assert_eq!(allow[1]["ports"][0].as_u64(), Some(50050));
        assert_eq!(allow[2]["trust"].as_bool(), Some(true));
        assert!(allow[2].get("ports").is_none());
    }

    #[test]
    fn test_placeholder_quoting_in_document() {
        let yaml = render_open(&topology(), &RangeDefaults::default()).unwrap();
        assert!(yaml.contains("- vm_name: '{{ range_id }}-ERSHON-DC1'\n"));
        assert!(yaml.contains("  hostname: ERSHON-DC1\n"));
        assert!(yaml.contains("    fqdn: ershon.local\n"));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let topology = topology();
        let defaults = RangeDefaults::default();
        assert_eq!(
            render_range(&topology, &defaults).unwrap(),
            render_range(&topology, &defaults).unwrap()
        );
    }
}
