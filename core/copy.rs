use crate::config::Config;
use crate::converter::{Converter, ConverterInfo, Priority};
use crate::error::{AppError, Result};
use log;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const COPY_EXT: &str = ".copy";
pub const OUTPUT_EXT: &str = ".html";

/// Converter for `.copy` files. The body is a newline-separated list of
/// include-file names; each named file is read from the includes directory
/// and spliced verbatim into the output, which is emitted as HTML.
#[derive(Debug, Clone)]
pub struct CopyConverter {
    includes_dir: PathBuf,
}

/// Resolution outcome for a single include-list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncludeEntry {
    pub name: String,
    pub path: PathBuf,
    pub exists: bool,
}

impl CopyConverter {
    pub fn new(includes_dir: impl Into<PathBuf>) -> Self {
        Self {
            includes_dir: includes_dir.into(),
        }
    }

    pub fn from_config(config: &Config, site_root: &Path) -> Self {
        Self::new(config.get_effective_includes_dir(site_root))
    }

    pub fn includes_dir(&self) -> &Path {
        &self.includes_dir
    }

    // Entries are joined verbatim; parent components in an entry resolve
    // wherever the filesystem join leads.
    fn resolve(&self, name: &str) -> PathBuf {
        self.includes_dir.join(name)
    }

    /// Resolve every entry of an include list without reading contents.
    pub fn audit(&self, content: &str) -> Vec<IncludeEntry> {
        content
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                let path = self.resolve(line);
                IncludeEntry {
                    name: line.to_string(),
                    exists: path.exists(),
                    path,
                }
            })
            .collect()
    }
}

impl Converter for CopyConverter {
    fn info(&self) -> ConverterInfo {
        ConverterInfo {
            safe: true,
            priority: Priority::Low,
        }
    }

    fn matches(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case(COPY_EXT)
    }

    fn output_ext(&self, _ext: &str) -> String {
        OUTPUT_EXT.to_string()
    }

    /// Splice the named include files together. A missing include is not an
    /// error: it degrades to a placeholder line plus a logged warning, and
    /// the conversion still succeeds.
    fn convert(&self, content: &str) -> Result<String> {
        let mut rendered = Vec::new();

        for line in content.split('\n') {
            if line.trim().is_empty() {
                continue;
            }
            let path = self.resolve(line);
            if path.exists() {
                log::trace!("Splicing include file: {}", path.display());
                let text = fs::read_to_string(&path).map_err(|e| AppError::FileRead {
                    path: path.clone(),
                    source: e,
                })?;
                rendered.push(text);
            } else {
                log::warn!("Cannot find included file {}", path.display());
                rendered.push(format!("Cannot find file {}", path.display()));
            }
        }

        Ok(rendered.join("\n"))
    }
}
