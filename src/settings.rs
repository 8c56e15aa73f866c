//! Embedded build settings.
//!
//! A build script serializes [`BuildSettings`] into the
//! `BUILDVERSION_BUILD_SETTINGS` compile-time variable (see
//! [`crate::emit`]); the [`embedded!`](crate::embedded) macro reads it back
//! in the consuming crate.

use serde::{Deserialize, Serialize};

/// Name of the compile-time variable carrying the serialized settings.
pub const SETTINGS_ENV: &str = "BUILDVERSION_BUILD_SETTINGS";

/// Main-module version recorded when no release version could be determined.
pub const DEVEL_VERSION: &str = "(devel)";

/// Setting key holding the full commit identifier.
pub const VCS_REVISION: &str = "vcs.revision";

/// Setting key holding the commit time.
pub const VCS_TIME: &str = "vcs.time";

/// Setting key holding the version-control system name.
pub const VCS: &str = "vcs";

/// Setting key recording whether the working tree had uncommitted changes.
pub const VCS_MODIFIED: &str = "vcs.modified";

/// Setting key holding the Cargo profile.
pub const BUILD_PROFILE: &str = "build.profile";

/// Setting key holding the target triple.
pub const BUILD_TARGET: &str = "build.target";

/// A single key/value build setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

/// Build information embedded into a binary at compile time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Identifier of the main package.
    #[serde(default)]
    pub path: String,

    /// Version of the main package, or [`DEVEL_VERSION`].
    #[serde(default)]
    pub version: String,

    /// Ordered build settings; keys may repeat.
    #[serde(default)]
    pub settings: Vec<Setting>,
}

impl BuildSettings {
    /// Decode the payload produced by the emitter.
    ///
    /// A missing or malformed payload yields `None`; the failure is logged,
    /// never returned.
    pub fn from_embedded(payload: Option<&str>) -> Option<Self> {
        let Some(payload) = payload else {
            tracing::debug!("no embedded build settings ({} not set at compile time)", SETTINGS_ENV);
            return None;
        };

        match serde_json::from_str(payload) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring malformed embedded build settings");
                None
            }
        }
    }

    /// Encode as a single line suitable for a `cargo:rustc-env` directive.
    pub fn to_payload(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Returns the value of the first setting with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings
            .iter()
            .find(|setting| setting.key == key)
            .map(|setting| setting.value.as_str())
    }

    /// Append a setting.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.push(Setting {
            key: key.into(),
            value: value.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BuildSettings {
        let mut settings = BuildSettings {
            path: "example-cli".to_string(),
            version: "v1.4.0".to_string(),
            settings: Vec::new(),
        };
        settings.push(VCS, "git");
        settings.push(VCS_REVISION, "0123456789abcdef0123456789abcdef01234567");
        settings.push(VCS_TIME, "2024-05-01T10:00:00Z");
        settings
    }

    #[test]
    fn missing_payload_is_none() {
        assert_eq!(BuildSettings::from_embedded(None), None);
    }

    #[test]
    fn malformed_payload_is_none() {
        assert_eq!(BuildSettings::from_embedded(Some("{not json")), None);
        assert_eq!(BuildSettings::from_embedded(Some("")), None);
    }

    #[test]
    fn payload_survives_encoding() {
        let settings = sample();
        let payload = settings.to_payload().unwrap();
        assert!(!payload.contains('\n'));
        assert_eq!(BuildSettings::from_embedded(Some(&payload)), Some(settings));
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let settings = BuildSettings::from_embedded(Some("{}")).unwrap();
        assert_eq!(settings, BuildSettings::default());
    }

    #[test]
    fn get_returns_first_occurrence() {
        let mut settings = sample();
        settings.push(VCS_REVISION, "ffffffffffffffffffffffffffffffffffffffff");
        assert_eq!(
            settings.get(VCS_REVISION),
            Some("0123456789abcdef0123456789abcdef01234567")
        );
    }

    #[test]
    fn get_missing_key_is_none() {
        assert_eq!(sample().get(VCS_MODIFIED), None);
    }
}
