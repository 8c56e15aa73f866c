//! Prints the build metadata of this binary.
//!
//! Reads the settings embedded by `build.rs`, applies compile-time overrides
//! and renders them (by default as a flat JSON object) to stdout.

mod cli;

use anyhow::Context;
use buildversion::{BuildInfo, embedded, exit_codes, injected};
use cli::{Cli, Format};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_TEMPLATE: &str = include_str!("../templates/version.tmpl");

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let mut info = BuildInfo::initialize(embedded!().as_ref());
    info.apply_overrides(injected!());
    tracing::debug!(?info, "resolved build metadata");

    match run(&cli, &info) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::from(exit_codes::SUCCESS as u8)
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code(&err) as u8)
        }
    }
}

fn run(cli: &Cli, info: &BuildInfo) -> anyhow::Result<String> {
    if let Some(path) = &cli.template {
        let body = std::fs::read_to_string(path)
            .map_err(buildversion::Error::from)
            .with_context(|| format!("failed to read template {}", path.display()))?;
        return Ok(info.template(&body));
    }

    match cli.format {
        Format::Template => Ok(info.template(DEFAULT_TEMPLATE)),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(info).context("failed to encode JSON")?;
            json.push('\n');
            Ok(json)
        }
        Format::Yaml => serde_yaml::to_string(info).context("failed to encode YAML"),
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<buildversion::Error>()
        .map(buildversion::Error::exit_code)
        .unwrap_or(exit_codes::USER_ERROR)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_renders_every_field() {
        let info = BuildInfo::initialize(None);
        let rendered = info.render(DEFAULT_TEMPLATE).unwrap();
        let record: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(record["version"], "development");
        assert_eq!(record["revision-short"], "");
        assert_eq!(record["os"], std::env::consts::OS);
    }

    #[test]
    fn template_errors_map_to_template_exit_code() {
        let err = anyhow::Error::from(buildversion::Error::from(
            buildversion::TemplateError::EmptyDirective { position: 0 },
        ))
        .context("failed to render template");
        assert_eq!(exit_code(&err), exit_codes::TEMPLATE_FAILURE);
    }

    #[test]
    fn other_errors_are_user_errors() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code(&err), exit_codes::USER_ERROR);
    }
}
