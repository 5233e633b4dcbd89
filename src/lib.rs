//! # ludus-forest - Range configuration generator for Ludus
//!
//! This library turns a declarative range description into the YAML range
//! configuration consumed by [Ludus](https://ludus.cloud): an Active
//! Directory forest root, child domains with their domain controllers and
//! members, standalone machines and optional attacker infrastructure.
//!
//! ## Overview
//!
//! Every run produces two variants of the same range. The *open* variant
//! allows all inter-VLAN traffic; the *segmented* variant isolates VLANs and
//! only opens the paths the forest and the C2 infrastructure need. Both
//! carry an identical machine list so switching between them never changes
//! a machine.
//!
//! ## Architecture
//!
//! - `config`: range description schema, defaults and validation
//! - `config_loader`: loading the description from YAML
//! - `ip`: address scheme and duplicate address detection
//! - `topology`: machine records, the builder and the role dependency graph
//! - `render`: range documents and the placeholder-safe YAML emitter
//! - `manifest`: JSON summary of machines and role dependencies
//! - `ludus`: template/role discovery and deployment through the Ludus CLI
//! - `orchestrator`: runs the whole pipeline
//! - `utils`: name and numeric validators
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ludus_forest::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("range.yaml"))?;
//! let files = orchestrator::generate_range_configs(&config, None, Path::new("ludus_output"))?;
//!
//! // ludus_output now contains:
//! // - range-config-open.yml
//! // - range-config-segmented.yml
//! // - range-manifest.json
//! println!("{}", files.segmented.display());
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Description Format
//!
//! ```yaml
//! range_id: MH
//! role_prefix: ludus_
//! parent:
//!   fqdn: ershon.local
//!   primary_dc:
//!     template: win2019-server-x64-template
//! children:
//!   - name: springfield
//!     primary_dc:
//!       template: win2019-server-x64-template
//!     members:
//!       - template: win10-21h2-x64-enterprise-template
//! ```
//!
//! ## Error Handling
//!
//! Each module reports failures through its own `thiserror` enum; the
//! orchestrator and the binary aggregate them with `color_eyre`.

pub mod config;
pub mod config_loader;
pub mod ip;
pub mod topology;
pub mod render;
pub mod manifest;
pub mod ludus;
pub mod utils;
pub mod orchestrator;
