use anyhow::{Context, Result};
use colored::*;
use log;
use splice_core::{AppError, COPY_EXT, Config, Converter, CopyConverter};
use std::fs;

use crate::cli_args::ConvertArgs;
use crate::load_config_for_command;
use crate::output::{write_to_file, write_to_stdout};

pub fn handle_convert_command(args: &ConvertArgs, quiet: bool) -> Result<()> {
    let site_root = Config::determine_site_root(args.site.site_root.as_ref())
        .context("Failed to determine site root")?;
    log::info!("Site root determined: {}", site_root.display());

    let config = load_config_for_command(&site_root, &args.site)
        .context("Failed to load configuration for convert command")?;
    let converter = CopyConverter::from_config(&config, &site_root);

    if !converter.claims(&args.file) {
        anyhow::bail!(AppError::InvalidArgument(format!(
            "File '{}' does not have a {} extension",
            args.file.display(),
            COPY_EXT
        )));
    }

    let content = fs::read_to_string(&args.file).map_err(|e| AppError::FileRead {
        path: args.file.clone(),
        source: e,
    })?;
    let rendered = converter.convert(&content)?;

    match &args.output {
        Some(path) => {
            write_to_file(path, &rendered)?;
            if !quiet {
                println!(
                    "{} Converted output saved to: {}",
                    "✅".green(),
                    path.display().to_string().blue()
                );
            }
        }
        None => {
            write_to_stdout(&rendered)?;
        }
    }
    Ok(())
}
