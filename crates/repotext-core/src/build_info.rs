//! Build-time metadata embedded by the build script.
//!
//! Used by the `/health` endpoint and the default HTTP `User-Agent`.

/// The git commit hash at build time (short form).
pub const GIT_HASH: &str = env!("REPOTEXT_GIT_HASH");

/// The build timestamp as a Unix epoch string.
pub const BUILD_TIMESTAMP: &str = env!("REPOTEXT_BUILD_TIMESTAMP");

/// The build profile (`debug` or `release`).
pub const BUILD_PROFILE: &str = env!("REPOTEXT_BUILD_PROFILE");

/// The crate version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Return a formatted version string including git hash and profile.
///
/// Example: `"0.1.0 (abc1234, debug)"`
pub fn version_string() -> String {
    format!("{VERSION} ({GIT_HASH}, {BUILD_PROFILE})")
}

/// Default `User-Agent` sent to the repository host.
pub fn user_agent() -> String {
    format!("repotext/{VERSION}")
}
