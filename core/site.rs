use crate::config::Config;
use crate::converter::Converter;
use crate::error::{AppError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use log;
use rayon::prelude::*;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Host-side settings for a whole-site pass: where sources live, where
/// converted pages land, and which sources are fed to the converter.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub use_gitignore: bool,
}

impl BuildOptions {
    pub fn from_config(config: &Config, site_root: &Path) -> Self {
        Self {
            source_dir: config.get_effective_source_dir(site_root),
            output_dir: config.get_effective_output_dir(site_root),
            include: config.build.include.clone(),
            exclude: config.build.exclude.clone(),
            use_gitignore: config.general.use_gitignore,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuiltPage {
    pub source: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub pages: Vec<BuiltPage>,
    pub failures: Vec<AppError>,
}

/// Walk the source tree and collect the files the converter claims, after
/// include/exclude filtering. The output directory is never walked. The
/// result is sorted for deterministic processing.
pub fn discover_sources(converter: &dyn Converter, opts: &BuildOptions) -> Result<Vec<PathBuf>> {
    log::debug!(
        "Discovering source files in: {}",
        opts.source_dir.display()
    );
    if !opts.source_dir.is_dir() {
        return Err(AppError::InvalidArgument(format!(
            "Source directory '{}' does not exist or is not a directory",
            opts.source_dir.display()
        )));
    }
    let include_set = build_glob_set_from_vec(&opts.include)?;
    let exclude_set = build_glob_set_from_vec(&opts.exclude)?;
    let has_includes = !opts.include.is_empty();

    // Relative location of the output dir inside the source tree, if it is
    // nested there. Entries under it are skipped.
    let output_rel = pathdiff::diff_paths(&opts.output_dir, &opts.source_dir).filter(|rel| {
        !rel.as_os_str().is_empty() && !rel.components().any(|c| c == Component::ParentDir)
    });

    let mut builder = WalkBuilder::new(&opts.source_dir);
    builder.hidden(false);
    builder.ignore(opts.use_gitignore);
    builder.git_ignore(opts.use_gitignore);
    builder.git_exclude(opts.use_gitignore);
    builder.require_git(false);
    log::debug!("WalkBuilder configured (gitignore: {})", opts.use_gitignore);

    let mut sources = Vec::new();
    for entry_result in builder.build() {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error walking directory: {}", e);
                continue;
            }
        };
        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();

        let Some(relative_path) = pathdiff::diff_paths(path, &opts.source_dir) else {
            log::warn!("Could not get relative path for: {}", path.display());
            continue;
        };
        if relative_path.components().next() == Some(Component::Normal(".git".as_ref())) {
            log::trace!("Skipping path within .git: {}", relative_path.display());
            continue;
        }
        if let Some(output_rel) = &output_rel {
            if relative_path.starts_with(output_rel) {
                log::trace!(
                    "Skipping path within output dir: {}",
                    relative_path.display()
                );
                continue;
            }
        }

        if !should_include(&relative_path, &include_set, has_includes, &exclude_set) {
            continue;
        }
        if !converter.claims(path) {
            log::trace!("Converter does not claim: {}", relative_path.display());
            continue;
        }

        log::trace!("Claimed source file: {}", relative_path.display());
        sources.push(path.to_path_buf());
    }

    sources.sort();
    log::info!("Discovered {} claimed source file(s).", sources.len());
    Ok(sources)
}

/// Convert every discovered source file and write the results under the
/// output directory. Per-file failures are collected, not fatal.
pub fn build_site(
    converter: &(dyn Converter + Sync),
    opts: &BuildOptions,
    quiet: bool,
) -> Result<BuildSummary> {
    let sources = discover_sources(converter, opts)?;
    log::info!("Converting {} source file(s)...", sources.len());

    let results: Vec<Result<BuiltPage>> = sources
        .into_par_iter()
        .map(|source| build_page(converter, &source, opts))
        .collect();

    let mut summary = BuildSummary::default();
    for res in results {
        match res {
            Ok(page) => summary.pages.push(page),
            Err(e) => summary.failures.push(e),
        }
    }
    summary.pages.sort_by(|a, b| a.source.cmp(&b.source));

    if !summary.failures.is_empty() && !quiet {
        use colored::Colorize;
        eprintln!(
            "\n{}",
            "Warning: errors encountered during site build:".yellow()
        );
        for err in &summary.failures {
            eprintln!(" - {}", err);
        }
        eprintln!("---");
    }

    log::info!("Site build complete: {} page(s).", summary.pages.len());
    Ok(summary)
}

fn build_page(converter: &dyn Converter, source: &Path, opts: &BuildOptions) -> Result<BuiltPage> {
    let content = fs::read_to_string(source).map_err(|e| AppError::FileRead {
        path: source.to_path_buf(),
        source: e,
    })?;
    let rendered = converter.convert(&content)?;

    let output = output_path_for(converter, source, opts)?;
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(&output, rendered).map_err(|e| AppError::FileWrite {
        path: output.clone(),
        source: e,
    })?;

    log::debug!("Built {} -> {}", source.display(), output.display());
    Ok(BuiltPage {
        source: source.to_path_buf(),
        output,
    })
}

/// Map a source file to its destination: the same relative location under
/// the output directory, with the converter's declared output extension.
fn output_path_for(
    converter: &dyn Converter,
    source: &Path,
    opts: &BuildOptions,
) -> Result<PathBuf> {
    let relative = pathdiff::diff_paths(source, &opts.source_dir).ok_or_else(|| {
        AppError::InvalidArgument(format!(
            "Source file '{}' is not relative to the source directory '{}'",
            source.display(),
            opts.source_dir.display()
        ))
    })?;

    let source_ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let output_ext = converter.output_ext(&source_ext);

    let mut output = opts.output_dir.join(relative);
    output.set_extension(output_ext.trim_start_matches('.'));
    Ok(output)
}

fn build_glob_set_from_vec(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern_str in patterns {
        let mut processed_pattern = pattern_str.trim().to_string();
        if processed_pattern.ends_with('/') && processed_pattern.len() > 1 {
            processed_pattern.push_str("**");
        }
        match Glob::new(&processed_pattern) {
            Ok(glob) => {
                log::trace!(
                    "Adding glob pattern: {} (processed as {})",
                    pattern_str,
                    processed_pattern
                );
                builder.add(glob);
            }
            Err(e) => {
                log::error!("Invalid glob pattern \"{}\": {}", pattern_str, e);
                return Err(AppError::Glob(format!(
                    "Invalid glob pattern \"{}\" (processed as \"{}\"): {}",
                    pattern_str, processed_pattern, e
                )));
            }
        }
    }
    builder.build().map_err(|e| {
        log::error!("Error building glob set: {}", e);
        AppError::Glob(e.to_string())
    })
}

fn should_include(
    relative_path: &Path,
    include_set: &GlobSet,
    has_includes: bool,
    exclude_set: &GlobSet,
) -> bool {
    if exclude_set.is_match(relative_path) {
        log::trace!(
            "Path excluded by exclude set: {}",
            relative_path.display()
        );
        return false;
    }
    if has_includes && !include_set.is_match(relative_path) {
        log::trace!(
            "Path not included by include set: {}",
            relative_path.display()
        );
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_patterns_match_whole_directories() {
        let set = build_glob_set_from_vec(&["drafts/".to_string()]).unwrap();
        assert!(set.is_match("drafts/old.copy"));
        assert!(set.is_match("drafts/2024/older.copy"));
        assert!(!set.is_match("pages/index.copy"));
    }

    #[test]
    fn invalid_glob_patterns_are_reported() {
        let result = build_glob_set_from_vec(&["[".to_string()]);
        assert!(matches!(result, Err(AppError::Glob(_))));
    }

    #[test]
    fn exclude_wins_over_include() {
        let include = build_glob_set_from_vec(&["**/*.copy".to_string()]).unwrap();
        let exclude = build_glob_set_from_vec(&["drafts/**".to_string()]).unwrap();
        assert!(should_include(
            Path::new("pages/index.copy"),
            &include,
            true,
            &exclude
        ));
        assert!(!should_include(
            Path::new("drafts/wip.copy"),
            &include,
            true,
            &exclude
        ));
    }

    #[test]
    fn empty_include_list_means_everything_is_eligible() {
        let include = build_glob_set_from_vec(&[]).unwrap();
        let exclude = build_glob_set_from_vec(&[]).unwrap();
        assert!(should_include(
            Path::new("anything.copy"),
            &include,
            false,
            &exclude
        ));
    }
}
