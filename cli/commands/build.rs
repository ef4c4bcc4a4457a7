use anyhow::{Context, Result};
use colored::*;
use log;
use splice_core::{BuildOptions, Config, CopyConverter, build_site};

use crate::cli_args::BuildArgs;
use crate::load_config_for_command;

pub fn handle_build_command(args: &BuildArgs, quiet: bool) -> Result<()> {
    let site_root = Config::determine_site_root(args.site.site_root.as_ref())
        .context("Failed to determine site root")?;
    log::info!("Site root determined: {}", site_root.display());

    let config = load_config_for_command(&site_root, &args.site)
        .context("Failed to load configuration for build command")?;
    let converter = CopyConverter::from_config(&config, &site_root);

    let mut opts = BuildOptions::from_config(&config, &site_root);
    if let Some(dir) = &args.source_dir {
        opts.source_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        opts.output_dir = dir.clone();
    }
    if !args.include.is_empty() {
        opts.include = args.include.clone();
    }
    if !args.exclude.is_empty() {
        opts.exclude = args.exclude.clone();
    }
    log::debug!("Build options after CLI overrides: {:?}", opts);

    let summary = build_site(&converter, &opts, quiet).context("Site build failed")?;

    if !quiet {
        println!(
            "{} Built {} page(s) into: {}",
            "✅".green(),
            summary.pages.len().to_string().cyan(),
            opts.output_dir.display().to_string().blue()
        );
    }

    if !summary.failures.is_empty() {
        anyhow::bail!("{} page(s) failed to build", summary.failures.len());
    }
    Ok(())
}
