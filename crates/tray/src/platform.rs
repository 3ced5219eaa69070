//! Helper binary resolution.
//!
//! Helpers ship per platform under `helpers/<key>/bin/<binary>` next to the
//! host executable, where `<key>` comes from [`PLATFORMS`]:
//! - `linux-x64`, `linux-arm64`
//! - `darwin-x64`, `darwin-arm64`
//! - `win32-x64`, `win32-arm64`

use std::path::{Path, PathBuf};

use crate::error::TrayError;

/// Environment variable overriding the helper executable path.
pub const HELPER_ENV_VAR: &str = "TRAYBRIDGE_HELPER";

/// Directory, next to the host executable, holding the per-platform helpers.
pub const HELPER_DIR: &str = "helpers";

/// One supported OS/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformEntry {
    /// OS name as reported by `std::env::consts::OS`.
    pub os: &'static str,
    /// Architecture as reported by `std::env::consts::ARCH`.
    pub arch: &'static str,
    /// Directory name of the helper package.
    pub key: &'static str,
}

impl PlatformEntry {
    const fn new(os: &'static str, arch: &'static str, key: &'static str) -> Self {
        Self { os, arch, key }
    }
}

/// Platforms with a published helper.
pub static PLATFORMS: &[PlatformEntry] = &[
    PlatformEntry::new("linux", "x86_64", "linux-x64"),
    PlatformEntry::new("linux", "aarch64", "linux-arm64"),
    PlatformEntry::new("macos", "x86_64", "darwin-x64"),
    PlatformEntry::new("macos", "aarch64", "darwin-arm64"),
    PlatformEntry::new("windows", "x86_64", "win32-x64"),
    PlatformEntry::new("windows", "aarch64", "win32-arm64"),
];

/// Returns the helper package key for an OS/architecture pair.
pub fn platform_key(os: &str, arch: &str) -> Option<&'static str> {
    PLATFORMS
        .iter()
        .find(|p| p.os == os && p.arch == arch)
        .map(|p| p.key)
}

/// Returns the helper executable file name for an OS.
pub fn binary_name(os: &str) -> &'static str {
    if os == "windows" { "tray.exe" } else { "tray" }
}

/// Returns the default helper location below `base` for an OS/architecture.
pub fn default_helper_path(base: &Path, os: &str, arch: &str) -> Result<PathBuf, TrayError> {
    let key = platform_key(os, arch).ok_or_else(|| TrayError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    })?;
    Ok(base
        .join(HELPER_DIR)
        .join(key)
        .join("bin")
        .join(binary_name(os)))
}

/// Resolves the helper executable for the current platform.
///
/// Lookup order: the explicit path, then [`HELPER_ENV_VAR`], then the
/// platform table relative to the directory of the running executable.
/// Only the last step can fail.
pub fn resolve_helper_path(explicit: Option<&Path>) -> Result<PathBuf, TrayError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    if let Some(path) = std::env::var_os(HELPER_ENV_VAR).filter(|v| !v.is_empty()) {
        tracing::debug!(var = HELPER_ENV_VAR, "helper path taken from environment");
        return Ok(PathBuf::from(path));
    }

    let base = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    default_helper_path(&base, std::env::consts::OS, std::env::consts::ARCH)
}
