//! Build information baked in at compile time.

/// Kept in step with the server package version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The source revision, if the build environment provided `FYYUR_REVISION`.
pub const REVISION: Option<&str> = option_env!("FYYUR_REVISION");

pub const BUILD_TIMESTAMP: Option<&str> = option_env!("FYYUR_BUILD_TIMESTAMP");
