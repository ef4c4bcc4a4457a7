use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::commands::check::CheckReport;

pub fn write_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let mut file =
        File::create(path).with_context(|| format!("Failed to create file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to file {}", path.display()))?;
    Ok(())
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_check_report_table(report: &CheckReport) -> Result<()> {
    println!();
    println!("{}", " Include Check Summary ".green().bold().underline());
    println!(
        "{:<16} {}",
        "Includes dir:".green(),
        report.includes_dir.cyan()
    );
    println!(
        "{:<16} {}",
        "Total entries:".green(),
        report.total_entries.to_string().cyan()
    );
    let missing = report.missing_entries.to_string();
    println!(
        "{:<16} {}",
        "Missing:".green(),
        if report.missing_entries == 0 {
            missing.green()
        } else {
            missing.red().bold()
        }
    );

    if report.files.is_empty() {
        println!("\n{}", "(No .copy files found to check)".yellow());
        println!();
        return Ok(());
    }

    println!("\n{}", " Include Entries ".green().bold().underline());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("File").fg(Color::Green),
        Cell::new("Include").fg(Color::Green),
        Cell::new("Status").fg(Color::Green),
    ]);
    for file in &report.files {
        for entry in &file.entries {
            let status = if entry.exists {
                Cell::new("found").fg(Color::Green)
            } else {
                Cell::new("missing").fg(Color::Red)
            };
            table.add_row(vec![
                Cell::new(&file.path).fg(Color::Cyan),
                Cell::new(&entry.name),
                status,
            ]);
        }
    }
    println!("{table}");
    println!();
    Ok(())
}
