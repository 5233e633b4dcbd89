use crate::config::RangeConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Load, parse and validate a range description from a YAML file
pub fn load_config(config_path: &Path) -> Result<RangeConfig> {
    info!("Loading range description from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open range description {:?}", config_path))?;

    let config: RangeConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse range description {:?}", config_path))?;

    config.validate()?;

    let skipped = config.children.iter().filter(|child| child.is_skipped()).count();
    if skipped > 0 {
        warn!("{} child domain(s) without a name will be skipped", skipped);
    }
    info!(
        "Range {}: forest {}, {} child domain(s), {} standalone machine(s), attackers {}",
        config.range_id,
        config.parent.fqdn,
        config.children.len() - skipped,
        config.standalone.len(),
        if config.attackers.is_some() { "enabled" } else { "disabled" }
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_range_description() {
        let yaml = r#"
range_id: MH
full_clone: true
parent:
  fqdn: ershon.local
  primary_dc:
    template: win2019-server-x64-template
children:
  - name: springfield
    primary_dc:
      template: win2019-server-x64-template
    members:
      - template: win10-21h2-x64-enterprise-template
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.range_id, "MH");
        assert!(config.full_clone);
        assert_eq!(config.children.len(), 1);
        assert_eq!(config.children[0].vlan, 20);
    }

    #[test]
    fn test_invalid_description_is_rejected() {
        let yaml = r#"
range_id: MH
parent:
  fqdn: ershon.local
  primary_dc:
    template: win2019-server-x64-template
    ip_last_octet: 0
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        assert!(load_config(temp_file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("missing.yaml")).is_err());
    }
}
