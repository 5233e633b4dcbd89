//! Ludus collaborators.
//!
//! Generation itself never talks to Ludus. Before a run the orchestrator asks
//! an [`Inventory`] which templates are built and which Ansible roles are
//! installed; after writing, a [`Deployer`] can push one of the documents
//! to the range and start a deployment. [`LudusCli`] implements both by
//! shelling out to the `ludus` binary, [`StaticInventory`] serves fixed
//! lists for offline runs and tests.

pub mod cli;
pub mod inventory;

use std::collections::BTreeSet;
use std::path::Path;

pub use cli::{LudusCli, DEFAULT_LUDUS_BIN};
pub use inventory::{parse_role_list, parse_template_list, StaticInventory};

/// Errors raised while talking to Ludus
#[derive(Debug, thiserror::Error)]
pub enum LudusError {
    #[error("Required Ansible roles are not installed: {}", .0.join(", "))]
    UnsatisfiedDependency(Vec<String>),
    #[error("Ludus command '{0}' not found in PATH")]
    CommandNotFound(String),
    #[error("Command '{command}' failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("Ludus reports no built templates")]
    EmptyTemplateCatalog,
    #[error("I/O error while running '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of the template catalog and installed roles
pub trait Inventory {
    /// Names of the templates that are built and usable
    fn fetch_available_templates(&self) -> Result<Vec<String>, LudusError>;
    /// Names of the installed Ansible roles
    fn fetch_installed_roles(&self) -> Result<Vec<String>, LudusError>;
}

/// Pushes a rendered document to the range and deploys it
pub trait Deployer {
    fn apply_config(&self, path: &Path) -> Result<(), LudusError>;
    fn deploy(&self) -> Result<(), LudusError>;
}

/// Fetch the template catalog, failing when it is empty
pub fn require_templates(inventory: &dyn Inventory) -> Result<Vec<String>, LudusError> {
    let templates = inventory.fetch_available_templates()?;
    if templates.is_empty() {
        return Err(LudusError::EmptyTemplateCatalog);
    }
    log::info!("Ludus reports {} built template(s)", templates.len());
    Ok(templates)
}

/// Check that every required role is installed
pub fn verify_required_roles<'a>(
    inventory: &dyn Inventory,
    required: impl IntoIterator<Item = &'a str>,
) -> Result<(), LudusError> {
    let installed = inventory.fetch_installed_roles()?;
    let missing: BTreeSet<&str> = required
        .into_iter()
        .filter(|role| !installed.iter().any(|r| r == role))
        .collect();

    if missing.is_empty() {
        log::info!("All required Ansible roles are installed");
        return Ok(());
    }
    Err(LudusError::UnsatisfiedDependency(
        missing.into_iter().map(str::to_string).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog_is_fatal() {
        let inventory = StaticInventory::new(Vec::<String>::new(), Vec::<String>::new());
        assert!(matches!(
            require_templates(&inventory),
            Err(LudusError::EmptyTemplateCatalog)
        ));
    }

    #[test]
    fn test_missing_roles_are_reported_sorted() {
        let inventory = StaticInventory::new(["win2019"], ["verify_dc_ready"]);
        let err = verify_required_roles(
            &inventory,
            ["verify_dc_ready", "join_child_domain", "create_child_domain"],
        )
        .unwrap_err();
        match err {
            LudusError::UnsatisfiedDependency(missing) => {
                assert_eq!(missing, vec!["create_child_domain", "join_child_domain"]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_installed_roles_pass() {
        let inventory = StaticInventory::new(["win2019"], ["a", "b"]);
        assert!(verify_required_roles(&inventory, ["a", "b"]).is_ok());
        assert!(verify_required_roles(&inventory, Vec::<&str>::new()).is_ok());
    }
}
