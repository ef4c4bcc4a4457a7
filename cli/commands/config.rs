use anyhow::{Context, Result};
use colored::*;
use log;
use splice_core::Config;
use splice_core::config::DEFAULT_CONFIG_FILENAME;

use crate::cli_args::ConfigArgs;
use crate::output::{write_to_file, write_to_stdout};

pub fn handle_config_command(args: &ConfigArgs, quiet: bool) -> Result<()> {
    let content =
        Config::default_config_toml().context("Failed to serialize default configuration")?;

    if !args.save {
        return write_to_stdout(&content);
    }

    let site_root = Config::determine_site_root(args.site.site_root.as_ref())
        .context("Failed to determine site root")?;
    let path = site_root.join(DEFAULT_CONFIG_FILENAME);
    log::debug!("Saving default configuration to: {}", path.display());

    if path.exists() {
        anyhow::bail!(
            "Config file already exists at '{}'. Remove it first to regenerate.",
            path.display()
        );
    }
    write_to_file(&path, &content)?;

    if !quiet {
        println!(
            "{} Default configuration saved to: {}",
            "✅".green(),
            path.display().to_string().blue()
        );
    }
    Ok(())
}
