use crate::error::{AppError, Result};
use log;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILENAME: &str = "splice.toml";
pub const DEFAULT_INCLUDES_DIR: &str = "_includes";
pub const DEFAULT_SOURCE_DIR: &str = ".";
pub const DEFAULT_OUTPUT_DIR: &str = "_site";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub build: BuildConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Directory include-list entries are resolved against. Joined to the
    /// site root unless absolute.
    #[serde(default = "default_includes_dir")]
    pub includes_dir: PathBuf,
    #[serde(default = "default_true")]
    pub use_gitignore: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_includes_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INCLUDES_DIR)
}
fn default_source_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE_DIR)
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            build: BuildConfig::default(),
        }
    }
}
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            includes_dir: default_includes_dir(),
            use_gitignore: default_true(),
        }
    }
}
impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

impl Config {
    pub fn determine_site_root(cli_site_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_to_resolve = match cli_site_root {
            Some(p) => p.clone(),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to canonicalize site root '{}': {}",
                    path_to_resolve.display(),
                    e
                ),
            ))
        })
    }

    pub fn resolve_config_path(
        site_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        match cli_config_file {
            Some(p_str) => {
                let path = PathBuf::from(p_str);
                let path = if path.is_absolute() {
                    path
                } else {
                    site_root.join(path)
                };
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Specified config file not found at path: {}",
                        path.display()
                    )));
                }
                log::debug!("Using specified config file path: {}", path.display());
                Ok(Some(path))
            }
            None => {
                let default_path = site_root.join(DEFAULT_CONFIG_FILENAME);
                if default_path.exists() {
                    log::debug!("Using default config file path: {}", default_path.display());
                    Ok(Some(default_path))
                } else {
                    log::debug!(
                        "No config file specified and default not found at: {}",
                        default_path.display()
                    );
                    Ok(None)
                }
            }
        }
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        toml::from_str::<Config>(&toml_content).map_err(|e| {
            AppError::TomlParse(format!(
                "Error parsing config file '{}': {}. Check TOML syntax and structure.",
                config_path.display(),
                e
            ))
        })
    }

    /// The default configuration rendered as TOML, for `config --save`.
    pub fn default_config_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).map_err(AppError::TomlSerialize)
    }

    pub fn get_effective_includes_dir(&self, site_root: &Path) -> PathBuf {
        resolve_against(site_root, &self.general.includes_dir)
    }

    pub fn get_effective_source_dir(&self, site_root: &Path) -> PathBuf {
        resolve_against(site_root, &self.build.source_dir)
    }

    pub fn get_effective_output_dir(&self, site_root: &Path) -> PathBuf {
        resolve_against(site_root, &self.build.output_dir)
    }
}

fn resolve_against(site_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        site_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_conventional_directories() {
        let config = Config::default();
        assert_eq!(config.general.includes_dir, PathBuf::from("_includes"));
        assert!(config.general.use_gitignore);
        assert_eq!(config.build.source_dir, PathBuf::from("."));
        assert_eq!(config.build.output_dir, PathBuf::from("_site"));
        assert!(config.build.include.is_empty());
        assert!(config.build.exclude.is_empty());
    }

    #[test]
    fn partial_toml_falls_back_to_field_defaults() {
        let config: Config = toml::from_str(
            r#"
            [general]
            includes_dir = "snippets"

            [build]
            exclude = ["drafts/**"]
            "#,
        )
        .unwrap();
        assert_eq!(config.general.includes_dir, PathBuf::from("snippets"));
        assert!(config.general.use_gitignore);
        assert_eq!(config.build.output_dir, PathBuf::from("_site"));
        assert_eq!(config.build.exclude, vec!["drafts/**".to_string()]);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = toml::from_str::<Config>("[general]\nincludes = \"_includes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn default_config_toml_round_trips() {
        let rendered = Config::default_config_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn effective_dirs_join_relative_paths_to_site_root() {
        let config = Config::default();
        let root = Path::new("/srv/site");
        assert_eq!(
            config.get_effective_includes_dir(root),
            PathBuf::from("/srv/site/_includes")
        );
        assert_eq!(
            config.get_effective_output_dir(root),
            PathBuf::from("/srv/site/_site")
        );
    }

    #[test]
    fn effective_dirs_keep_absolute_paths() {
        let mut config = Config::default();
        config.general.includes_dir = PathBuf::from("/var/shared/_includes");
        assert_eq!(
            config.get_effective_includes_dir(Path::new("/srv/site")),
            PathBuf::from("/var/shared/_includes")
        );
    }
}
