//! Build metadata for `--version` banners.
//!
//! A binary gets its metadata in three steps:
//!
//! 1. Its `build.rs` runs [`emit::Emitter`], which embeds git and build
//!    settings into the crate's compile environment.
//! 2. `main` calls [`BuildInfo::initialize`] with [`embedded!`], then
//!    [`BuildInfo::apply_overrides`] with [`injected!`] so release tooling can
//!    force a version, revision or timestamp.
//! 3. The result is rendered through a `{Field}` template.
//!
//! ```
//! use buildversion::{BuildInfo, embedded, injected};
//!
//! let mut info = BuildInfo::initialize(embedded!().as_ref());
//! info.apply_overrides(injected!());
//!
//! let banner = info.render("{Version} ({ShortRevision}) {OS}/{Arch}").unwrap();
//! assert!(banner.contains(std::env::consts::OS));
//! ```
//!
//! Available fields: `Path`, `Version`, `Revision`, `ShortRevision`,
//! `Timestamp`, `OS`, `Arch`, `Runtime`.

pub mod emit;
pub mod error;
pub mod exit_codes;
pub mod info;
pub mod settings;
pub mod template;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, Result};
pub use info::{BuildInfo, Overrides};
pub use settings::BuildSettings;
pub use template::TemplateError;

/// Build settings embedded by [`emit::Emitter`] into the calling crate.
///
/// Expands to an `Option<BuildSettings>`; `None` when the calling crate has
/// no build script emitting them or the payload is unreadable.
#[macro_export]
macro_rules! embedded {
    () => {
        $crate::BuildSettings::from_embedded(::core::option_env!("BUILDVERSION_BUILD_SETTINGS"))
    };
}

/// Overrides injected through the calling crate's compile-time environment.
///
/// Reads `BUILDVERSION_VERSION`, `BUILDVERSION_REVISION` and
/// `BUILDVERSION_TIMESTAMP`; unset variables become empty strings.
///
/// ```sh
/// BUILDVERSION_VERSION=v1.0.0 cargo build --release
/// ```
#[macro_export]
macro_rules! injected {
    () => {
        $crate::Overrides::new(
            match ::core::option_env!("BUILDVERSION_VERSION") {
                Some(value) => value,
                None => "",
            },
            match ::core::option_env!("BUILDVERSION_REVISION") {
                Some(value) => value,
                None => "",
            },
            match ::core::option_env!("BUILDVERSION_TIMESTAMP") {
                Some(value) => value,
                None => "",
            },
        )
    };
}
