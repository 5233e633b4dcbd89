//! Parsing of Ludus table output and the static inventory.

use super::{Inventory, LudusError};

/// Column marker of a built template in `ludus templates list`
const BUILT_MARKER: &str = "TRUE";

/// Second whitespace-separated column of a table row. Box-drawn tables put
/// a `|` in the first column, plain listings put an index there.
fn second_column(line: &str) -> Option<&str> {
    line.split_whitespace().nth(1)
}

fn is_table_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.chars().all(|c| matches!(c, '+' | '-' | '='))
}

/// Built template names from `ludus templates list`
pub fn parse_template_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.split_whitespace().any(|cell| cell == BUILT_MARKER))
        .filter_map(second_column)
        .map(str::to_string)
        .collect()
}

/// Installed role names from `ludus ansible role list`
pub fn parse_role_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !is_table_rule(line))
        .filter_map(second_column)
        .filter(|cell| *cell != "|" && !cell.eq_ignore_ascii_case("name"))
        .map(str::to_string)
        .collect()
}

/// Inventory backed by fixed lists
#[derive(Debug, Clone, Default)]
pub struct StaticInventory {
    templates: Vec<String>,
    roles: Vec<String>,
}

impl StaticInventory {
    pub fn new<T, R>(templates: T, roles: R) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl Inventory for StaticInventory {
    fn fetch_available_templates(&self) -> Result<Vec<String>, LudusError> {
        Ok(self.templates.clone())
    }

    fn fetch_installed_roles(&self) -> Result<Vec<String>, LudusError> {
        Ok(self.roles.clone())
    }
}
