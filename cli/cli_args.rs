use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct SiteOpts {
    #[arg(
        long,
        help = "Specify the target site directory (default: current dir).",
        help_heading = "Site Setup",
        value_name = "PATH"
    )]
    pub site_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: splice.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config_file",
        help_heading = "Site Setup"
    )]
    pub config_file: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config_file",
        help_heading = "Site Setup"
    )]
    pub no_config_file: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Splice include files into HTML pages.",
    long_about = "splice converts .copy files, whose bodies list include-file names one per \nline, into HTML by concatenating the contents of the named files from the \nsite's includes directory. Single files, whole-site builds, and include \naudits are supported.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  splice convert index.copy\n  splice build --exclude 'drafts/**'\n  splice check -f json\n  splice config --save",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "c",
        about = "Convert a single .copy file and print or save the result."
    )]
    Convert(ConvertArgs),

    #[command(
        visible_alias = "b",
        about = "Convert every claimed source file into the output directory."
    )]
    Build(BuildArgs),

    #[command(about = "Verify that every referenced include file exists.")]
    Check(CheckArgs),

    #[command(about = "Show or save the default configuration file structure.")]
    Config(ConfigArgs),

    #[command(about = "Generate shell completion scripts.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    #[clap(flatten)]
    pub site: SiteOpts,

    #[arg(value_name = "FILE", help = "The .copy file to convert.")]
    pub file: PathBuf,

    #[arg(
        short,
        long,
        value_name = "OUT",
        help = "Write the converted output to OUT instead of stdout."
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[clap(flatten)]
    pub site: SiteOpts,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory scanned for source files (overrides config).",
        help_heading = "Build Control"
    )]
    pub source_dir: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Directory converted pages are written to (overrides config).",
        help_heading = "Build Control"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(
        long = "include",
        value_name = "GLOB",
        help = "Only convert sources matching this glob (repeatable).",
        help_heading = "Build Control"
    )]
    pub include: Vec<String>,

    #[arg(
        long = "exclude",
        value_name = "GLOB",
        help = "Skip sources matching this glob (repeatable).",
        help_heading = "Build Control"
    )]
    pub exclude: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[clap(flatten)]
    pub site: SiteOpts,

    #[arg(
        value_name = "FILE",
        help = "Check a single .copy file instead of the whole site."
    )]
    pub file: Option<PathBuf>,

    #[arg(short = 'f', long, help = "Set the output format.", value_name = "FORMAT", value_parser = ["json"])]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub site: SiteOpts,

    #[arg(long, help = "Write the default configuration to <site-root>/splice.toml.")]
    pub save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        value_enum,
        value_name = "SHELL",
        help = "Shell to generate a completion script for."
    )]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_accepts_repeated_filter_globs() {
        let cli = Cli::parse_from([
            "splice", "build", "--exclude", "drafts/**", "--exclude", "tmp/**",
        ]);
        match cli.command {
            Some(Commands::Build(args)) => {
                assert_eq!(args.exclude, vec!["drafts/**", "tmp/**"]);
                assert!(args.include.is_empty());
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }
}
