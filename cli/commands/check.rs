use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log;
use serde::Serialize;
use splice_core::{
    AppError, BuildOptions, COPY_EXT, Config, Converter, CopyConverter, IncludeEntry,
    discover_sources,
};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli_args::CheckArgs;
use crate::load_config_for_command;
use crate::output::{print_check_report_table, write_to_stdout};

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub generated_at: DateTime<Utc>,
    pub includes_dir: String,
    pub total_entries: usize,
    pub missing_entries: usize,
    pub files: Vec<FileReport>,
}

#[derive(Debug, Serialize)]
pub struct FileReport {
    pub path: String,
    pub entries: Vec<IncludeEntry>,
}

pub fn handle_check_command(args: &CheckArgs, quiet: bool) -> Result<()> {
    let site_root = Config::determine_site_root(args.site.site_root.as_ref())
        .context("Failed to determine site root")?;
    log::info!("Site root determined: {}", site_root.display());

    let config = load_config_for_command(&site_root, &args.site)
        .context("Failed to load configuration for check command")?;
    let converter = CopyConverter::from_config(&config, &site_root);

    let sources: Vec<PathBuf> = match &args.file {
        Some(file) => {
            if !converter.claims(file) {
                anyhow::bail!(AppError::InvalidArgument(format!(
                    "File '{}' does not have a {} extension",
                    file.display(),
                    COPY_EXT
                )));
            }
            vec![file.clone()]
        }
        None => {
            let opts = BuildOptions::from_config(&config, &site_root);
            discover_sources(&converter, &opts).context("Failed to discover source files")?
        }
    };
    log::debug!("Auditing {} source file(s)...", sources.len());

    let report = audit_sources(&converter, &sources, &site_root)?;

    if args.format.as_deref() == Some("json") {
        let content = serde_json::to_string_pretty(&report)
            .context("Failed to serialize check report")?;
        write_to_stdout(&content)?;
    } else if !quiet {
        print_check_report_table(&report)?;
    }

    if report.missing_entries > 0 {
        anyhow::bail!("{} missing include(s)", report.missing_entries);
    }
    Ok(())
}

fn audit_sources(
    converter: &CopyConverter,
    sources: &[PathBuf],
    site_root: &Path,
) -> Result<CheckReport> {
    let mut files = Vec::new();
    let mut total_entries = 0;
    let mut missing_entries = 0;

    for source in sources {
        let content = fs::read_to_string(source).map_err(|e| AppError::FileRead {
            path: source.clone(),
            source: e,
        })?;
        let entries = converter.audit(&content);
        total_entries += entries.len();
        missing_entries += entries.iter().filter(|e| !e.exists).count();

        let relative_path = pathdiff::diff_paths(source, site_root)
            .unwrap_or_else(|| source.clone())
            .to_string_lossy()
            .to_string();
        files.push(FileReport {
            path: relative_path,
            entries,
        });
    }

    Ok(CheckReport {
        generated_at: Utc::now(),
        includes_dir: converter.includes_dir().display().to_string(),
        total_entries,
        missing_entries,
        files,
    })
}
