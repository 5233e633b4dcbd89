//! `ludus` command-line backed inventory and deployer.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use super::inventory::{parse_role_list, parse_template_list};
use super::{Deployer, Inventory, LudusError};

/// Binary looked up in PATH when none is configured
pub const DEFAULT_LUDUS_BIN: &str = "ludus";

/// Runs `ludus` subcommands and captures their output
#[derive(Debug, Clone)]
pub struct LudusCli {
    binary: PathBuf,
}

impl Default for LudusCli {
    fn default() -> Self {
        Self::new(DEFAULT_LUDUS_BIN)
    }
}

impl LudusCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.binary.display(), args.join(" "))
    }

    /// Run a subcommand and return its stdout
    fn run(&self, args: &[&str]) -> Result<String, LudusError> {
        let command = self.describe(args);
        debug!("Running: {}", command);

        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => {
                    LudusError::CommandNotFound(self.binary.display().to_string())
                }
                _ => LudusError::Io {
                    command: command.clone(),
                    source,
                },
            })?;

        if !output.status.success() {
            return Err(LudusError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Inventory for LudusCli {
    fn fetch_available_templates(&self) -> Result<Vec<String>, LudusError> {
        info!("Fetching available Ludus templates...");
        let output = self.run(&["templates", "list"])?;
        Ok(parse_template_list(&output))
    }

    fn fetch_installed_roles(&self) -> Result<Vec<String>, LudusError> {
        info!("Checking for installed Ansible roles...");
        let output = self.run(&["ansible", "role", "list"])?;
        Ok(parse_role_list(&output))
    }
}

impl Deployer for LudusCli {
    fn apply_config(&self, path: &Path) -> Result<(), LudusError> {
        let path = path.to_string_lossy();
        info!("Setting range config from {}", path);
        self.run(&["range", "config", "set", "-f", path.as_ref()])?;
        Ok(())
    }

    fn deploy(&self) -> Result<(), LudusError> {
        info!("Starting range deployment");
        self.run(&["range", "deploy"])?;
        Ok(())
    }
}
