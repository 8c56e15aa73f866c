//! CLI argument parsing for buildversion-cmd.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Print the build metadata embedded into this binary.
///
/// Version, revision and timestamp can be forced at compile time with the
/// BUILDVERSION_VERSION, BUILDVERSION_REVISION and BUILDVERSION_TIMESTAMP
/// environment variables; BUILDVERSION_VCS=false disables git stamping.
#[derive(Parser, Debug)]
#[command(name = "buildversion-cmd")]
#[command(author, about, long_about = None)]
pub struct Cli {
    /// Render this template file instead of the built-in JSON template.
    #[arg(short, long, value_name = "FILE", conflicts_with = "format")]
    pub template: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Template)]
    pub format: Format,

    /// Log extraction details to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// How the build metadata is printed.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// Render a `{Field}` template.
    Template,
    /// Serialize every field as JSON.
    Json,
    /// Serialize every field as YAML.
    Yaml,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_defaults() {
        let cli = Cli::try_parse_from(["buildversion-cmd"]).unwrap();
        assert_eq!(cli.format, Format::Template);
        assert!(cli.template.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn parse_template_file() {
        let cli = Cli::try_parse_from(["buildversion-cmd", "--template", "banner.tmpl", "-v"]).unwrap();
        assert_eq!(cli.template, Some(PathBuf::from("banner.tmpl")));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_format() {
        let cli = Cli::try_parse_from(["buildversion-cmd", "--format", "yaml"]).unwrap();
        assert_eq!(cli.format, Format::Yaml);
    }

    #[test]
    fn template_conflicts_with_format() {
        let result = Cli::try_parse_from(["buildversion-cmd", "-t", "x.tmpl", "-f", "json"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_unknown_format_fails() {
        assert!(Cli::try_parse_from(["buildversion-cmd", "--format", "toml"]).is_err());
    }
}
