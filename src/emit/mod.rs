//! Build-script side: collect build settings and embed them into a crate.
//!
//! Call from a consumer's `build.rs`:
//!
//! ```no_run
//! fn main() {
//!     buildversion::emit::Emitter::new().emit().unwrap();
//! }
//! ```
//!
//! The consumer then reads the result with
//! [`embedded!`](crate::embedded). Git problems never fail the build; the
//! affected settings are simply left out.

pub mod git;

use crate::settings::{self, BuildSettings};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Environment variable that disables VCS stamping when set to a false value.
pub const VCS_ENV: &str = "BUILDVERSION_VCS";

/// Compile-time variables read by [`injected!`](crate::injected).
pub const OVERRIDE_ENVS: [&str; 3] = [
    "BUILDVERSION_VERSION",
    "BUILDVERSION_REVISION",
    "BUILDVERSION_TIMESTAMP",
];

static SEMVER_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?$")
        .expect("Invalid semver tag regex")
});

/// Collects build settings and writes the `cargo:` directives that embed them.
#[derive(Debug, Clone)]
pub struct Emitter {
    path: String,
    workdir: PathBuf,
    vcs: bool,
    profile: Option<String>,
    target: Option<String>,
    warnings: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    /// Configure from the variables Cargo sets for build scripts.
    pub fn new() -> Self {
        let workdir = env::var_os("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            path: env::var("CARGO_PKG_NAME").unwrap_or_default(),
            workdir,
            vcs: vcs_enabled(env::var(VCS_ENV).ok().as_deref()),
            profile: env::var("PROFILE").ok(),
            target: env::var("TARGET").ok(),
            warnings: false,
        }
    }

    /// Package identifier recorded as the main path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Directory git commands run in.
    pub fn workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    /// Enable or disable version-control stamping.
    pub fn vcs(mut self, enabled: bool) -> Self {
        self.vcs = enabled;
        self
    }

    /// Report git failures as `cargo:warning` lines.
    pub fn warnings(mut self, enabled: bool) -> Self {
        self.warnings = enabled;
        self
    }

    /// Probe git and the build environment.
    pub fn collect(&self) -> BuildSettings {
        self.probe().0
    }

    fn probe(&self) -> (BuildSettings, Vec<String>) {
        let mut collected = BuildSettings {
            path: self.path.clone(),
            version: settings::DEVEL_VERSION.to_string(),
            settings: Vec::new(),
        };
        let mut warnings = Vec::new();

        if let Some(profile) = &self.profile {
            collected.push(settings::BUILD_PROFILE, profile.as_str());
        }
        if let Some(target) = &self.target {
            collected.push(settings::BUILD_TARGET, target.as_str());
        }

        if !self.vcs {
            tracing::debug!("version-control stamping disabled");
            return (collected, warnings);
        }

        let revision = match git::head_revision(&self.workdir) {
            Ok(revision) if !revision.is_empty() => revision,
            Ok(_) => return (collected, warnings),
            Err(e) => {
                tracing::debug!(error = %e, "no version-control information available");
                warnings.push(e.to_string());
                return (collected, warnings);
            }
        };

        collected.push(settings::VCS, "git");
        collected.push(settings::VCS_REVISION, revision);

        match git::head_commit_time(&self.workdir) {
            Ok(time) => match normalize_time(&time) {
                Some(time) => collected.push(settings::VCS_TIME, time),
                None => warnings.push(format!("unrecognized commit time '{}'", time)),
            },
            Err(e) => warnings.push(e.to_string()),
        }

        match git::is_modified(&self.workdir) {
            Ok(modified) => collected.push(settings::VCS_MODIFIED, modified.to_string()),
            Err(e) => warnings.push(e.to_string()),
        }

        match git::tags_at_head(&self.workdir) {
            Ok(tags) => {
                if let Some(tag) = tags.into_iter().find(|tag| is_semver_tag(tag)) {
                    collected.version = tag;
                }
            }
            Err(e) => warnings.push(e.to_string()),
        }

        (collected, warnings)
    }

    /// Git files whose changes invalidate the collected settings.
    ///
    /// Resolved through git so crates nested below the repository root and
    /// linked worktrees (where `.git` is a file) are tracked as well. Only
    /// existing paths are returned; Cargo reruns on every build otherwise.
    fn tracked_git_paths(&self) -> Vec<PathBuf> {
        let (Ok(git_dir), Ok(common_dir)) = (
            git::git_dir(&self.workdir),
            git::common_dir(&self.workdir),
        ) else {
            return Vec::new();
        };

        [
            git_dir.join("HEAD"),
            git_dir.join("index"),
            common_dir.join("refs"),
            common_dir.join("packed-refs"),
        ]
        .into_iter()
        .filter(|path| path.exists())
        .collect()
    }

    /// Write the directives to stdout, where Cargo reads them.
    pub fn emit(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.emit_to(&mut lock)
    }

    /// Write the directives to `out`.
    pub fn emit_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let (collected, warnings) = self.probe();
        let payload = collected
            .to_payload()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(out, "cargo:rustc-env={}={}", settings::SETTINGS_ENV, payload)?;

        if self.vcs {
            for path in self.tracked_git_paths() {
                writeln!(out, "cargo:rerun-if-changed={}", path.display())?;
            }
        }

        writeln!(out, "cargo:rerun-if-env-changed={}", VCS_ENV)?;
        for name in OVERRIDE_ENVS {
            writeln!(out, "cargo:rerun-if-env-changed={}", name)?;
        }

        if self.warnings {
            for warning in warnings {
                writeln!(out, "cargo:warning=buildversion: {}", warning)?;
            }
        }

        Ok(())
    }
}

/// Interpret the [`VCS_ENV`] value; anything but an explicit "off" keeps stamping on.
fn vcs_enabled(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) => !matches!(v.as_str(), "0" | "false" | "off" | "no"),
        None => true,
    }
}

/// Convert a git ISO 8601 date to UTC RFC3339 with second precision.
fn normalize_time(raw: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|time| {
            time.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        })
}

fn is_semver_tag(tag: &str) -> bool {
    SEMVER_TAG_REGEX.is_match(tag)
}
