//! Build information stamped by `build.rs`.
//!
//! - `GIT_HASH`: short commit hash, or "unknown" outside a git checkout
//! - `BUILD_TIME_UTC`: RFC3339 build timestamp
//! - `RUSTC_VERSION`: compiler used for the build

/// Git commit hash of the build, or "unknown" if not available.
pub const GIT_HASH: &str = env!("SCHEMA_REFLECT_GIT_HASH");

/// Build timestamp in RFC3339 format.
pub const BUILD_TIME_UTC: &str = env!("SCHEMA_REFLECT_BUILD_TIME_UTC");

/// Rustc version used for the build.
pub const RUSTC_VERSION: &str = env!("SCHEMA_REFLECT_RUSTC_VERSION");

/// One-line version banner used by the CLI.
pub fn version_line() -> String {
    format!(
        "{} {} ({}, built {} with {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        GIT_HASH,
        BUILD_TIME_UTC,
        RUSTC_VERSION
    )
}
