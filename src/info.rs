//! The build metadata record and its lifecycle: initialize, override, render.

use crate::exit_codes;
use crate::settings::{self, BuildSettings};
use crate::template::{TemplateError, render_template};
use serde::Serialize;

/// Version reported when nothing better is discoverable.
pub const DEFAULT_VERSION: &str = "development";

/// Length of [`BuildInfo::short_revision`].
pub const SHORT_REVISION_LEN: usize = 7;

/// Toolchain that compiled this crate (and therefore the consuming binary).
const RUSTC_VERSION: &str = env!("BUILDVERSION_RUSTC_VERSION");

/// Template field names, in the order [`BuildInfo::fields`] yields them.
pub const FIELD_NAMES: [&str; 8] = [
    "Path",
    "Version",
    "Revision",
    "ShortRevision",
    "Timestamp",
    "OS",
    "Arch",
    "Runtime",
];

/// Build-time and run-time properties available to templates.
///
/// Serializes with the template field names as keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// Identifier of the main package.
    #[serde(rename = "Path")]
    pub path: String,

    /// Arbitrary version string.
    #[serde(rename = "Version")]
    pub version: String,

    /// Full commit identifier.
    #[serde(rename = "Revision")]
    pub revision: String,

    /// `revision` truncated to its first 7 characters.
    #[serde(rename = "ShortRevision")]
    pub short_revision: String,

    /// Commit or build time, usually RFC3339.
    #[serde(rename = "Timestamp")]
    pub timestamp: String,

    /// Operating system of the running process.
    #[serde(rename = "OS")]
    pub os: String,

    /// CPU architecture of the running process.
    #[serde(rename = "Arch")]
    pub arch: String,

    /// Toolchain version.
    #[serde(rename = "Runtime")]
    pub runtime: String,
}

/// Values injected at compile time that take precedence over extracted ones.
///
/// Empty strings mean "not injected". See [`injected!`](crate::injected).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overrides<'a> {
    pub version: &'a str,
    pub revision: &'a str,
    pub timestamp: &'a str,
}

impl<'a> Overrides<'a> {
    pub fn new(version: &'a str, revision: &'a str, timestamp: &'a str) -> Self {
        Self {
            version,
            revision,
            timestamp,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.version.is_empty() && self.revision.is_empty() && self.timestamp.is_empty()
    }
}

/// First [`SHORT_REVISION_LEN`] characters of `revision`, or all of it when shorter.
pub fn short_revision(revision: &str) -> String {
    revision.chars().take(SHORT_REVISION_LEN).collect()
}

impl BuildInfo {
    /// Build the record from the running platform plus any embedded settings.
    ///
    /// Never fails: absent settings leave path, revision and timestamp empty,
    /// and the version falls back to [`DEFAULT_VERSION`].
    pub fn initialize(embedded: Option<&BuildSettings>) -> Self {
        let mut info = Self {
            path: String::new(),
            version: String::new(),
            revision: String::new(),
            short_revision: String::new(),
            timestamp: String::new(),
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            runtime: RUSTC_VERSION.to_string(),
        };

        if let Some(embedded) = embedded {
            info.path = embedded.path.clone();

            match embedded.get(settings::VCS_REVISION) {
                Some(revision) => info.set_revision(revision),
                None => tracing::debug!("embedded build settings carry no {}", settings::VCS_REVISION),
            }

            if let Some(time) = embedded.get(settings::VCS_TIME) {
                info.timestamp = time.to_string();
            }

            if embedded.version != settings::DEVEL_VERSION {
                info.version = embedded.version.clone();
            }
        }

        if info.version.is_empty() {
            info.version = DEFAULT_VERSION.to_string();
        }

        info
    }

    /// Replace version, revision and timestamp with every non-empty override.
    pub fn apply_overrides(&mut self, overrides: Overrides<'_>) {
        if !overrides.version.is_empty() {
            self.version = overrides.version.to_string();
        }

        if !overrides.revision.is_empty() {
            self.set_revision(overrides.revision);
        }

        if !overrides.timestamp.is_empty() {
            self.timestamp = overrides.timestamp.to_string();
        }
    }

    fn set_revision(&mut self, revision: &str) {
        self.revision = revision.to_string();
        self.short_revision = short_revision(revision);
    }

    /// Look up a field by its template name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "Path" => &self.path,
            "Version" => &self.version,
            "Revision" => &self.revision,
            "ShortRevision" => &self.short_revision,
            "Timestamp" => &self.timestamp,
            "OS" => &self.os,
            "Arch" => &self.arch,
            "Runtime" => &self.runtime,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// All fields as `(template name, value)` pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FIELD_NAMES
            .into_iter()
            .filter_map(move |name| self.field(name).map(|value| (name, value)))
    }

    /// Render `body`, substituting `{Field}` directives.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] if the template is malformed or names an
    /// unknown field. Nothing is rendered in that case.
    pub fn render(&self, body: &str) -> Result<String, TemplateError> {
        render_template(body, |name| self.field(name))
    }

    /// Render `body`, terminating the process if the template is invalid.
    ///
    /// Templates are expected to be compiled into the binary, so a failure
    /// here is a build defect. The process exits with
    /// [`exit_codes::TEMPLATE_FAILURE`].
    pub fn template(&self, body: &str) -> String {
        match self.render(body) {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::error!(error = %err, "failed to render version template");
                eprintln!("Error: {}", err);
                std::process::exit(exit_codes::TEMPLATE_FAILURE);
            }
        }
    }
}
