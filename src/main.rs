use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use ludus_forest::config_loader;
use ludus_forest::ludus::{Deployer, Inventory, LudusCli, DEFAULT_LUDUS_BIN};
use ludus_forest::orchestrator::{generate_range_configs, RangeVariant};

/// Range configuration generator for Active Directory forests on Ludus
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the range description YAML file
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory for the range documents and manifest
    #[arg(short, long, default_value = "ludus_output")]
    output: PathBuf,

    /// Skip template and role discovery through the Ludus CLI
    #[arg(long)]
    offline: bool,

    /// Ludus binary to invoke
    #[arg(long, default_value = DEFAULT_LUDUS_BIN)]
    ludus_bin: PathBuf,

    /// Set the range config to the given variant after generation
    #[arg(long, value_enum, conflicts_with = "offline")]
    apply: Option<RangeVariant>,

    /// Deploy the range after applying the config
    #[arg(long, requires = "apply")]
    deploy: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting ludus-forest range generator");
    info!("Range description: {:?}", args.config);
    info!("Output directory: {:?}", args.output);

    let config = config_loader::load_config(&args.config)?;

    let cli = LudusCli::new(&args.ludus_bin);
    let inventory: Option<&dyn Inventory> = if args.offline { None } else { Some(&cli) };
    let files = generate_range_configs(&config, inventory, &args.output)?;

    info!("Open range config: {:?}", files.open);
    info!("Segmented range config: {:?}", files.segmented);
    info!("Range manifest: {:?}", files.manifest);

    match args.apply {
        Some(variant) => {
            let document = files.document(variant);
            cli.apply_config(document)
                .wrap_err_with(|| format!("Failed to set range config from {:?}", document))?;
            if args.deploy {
                cli.deploy().wrap_err("Failed to start range deployment")?;
                info!("Deployment started; follow it with: ludus range logs -f");
            }
        }
        None => {
            info!(
                "Apply a variant with: ludus range config set -f {}",
                files.segmented.display()
            );
        }
    }

    info!("Range generation completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["ludus-forest", "--config", "range.yaml"]);

        assert_eq!(args.config, PathBuf::from("range.yaml"));
        assert_eq!(args.output, PathBuf::from("ludus_output"));
        assert_eq!(args.ludus_bin, PathBuf::from("ludus"));
        assert!(!args.offline);
        assert!(args.apply.is_none());
    }

    #[test]
    fn test_apply_and_deploy_args() {
        let args = Args::parse_from([
            "ludus-forest",
            "--config", "range.yaml",
            "--apply", "segmented",
            "--deploy",
        ]);

        assert_eq!(args.apply, Some(RangeVariant::Segmented));
        assert!(args.deploy);
    }

    #[test]
    fn test_deploy_requires_apply() {
        let result = Args::try_parse_from(["ludus-forest", "--config", "range.yaml", "--deploy"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_offline_conflicts_with_apply() {
        let result = Args::try_parse_from([
            "ludus-forest",
            "--config", "range.yaml",
            "--offline",
            "--apply", "open",
        ]);
        assert!(result.is_err());
    }
}
