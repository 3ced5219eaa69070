//! Demo configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/traybridge/demo.toml`
//! - Windows: `%APPDATA%/traybridge/demo.toml`
//! - macOS: `~/Library/Application Support/traybridge/demo.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Demo configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Tooltip shown on the tray icon.
    #[serde(default = "default_tooltip")]
    pub tooltip: String,

    /// Helper executable; the platform lookup is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_path: Option<PathBuf>,

    /// PNG icon, used on Linux and macOS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_png: Option<PathBuf>,

    /// ICO icon, used on Windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_ico: Option<PathBuf>,

    /// Entries listed under "Open Recent", most recent first.
    #[serde(default = "default_recent")]
    pub recent: Vec<String>,

    /// How many recent entries the menu shows.
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
}

fn default_tooltip() -> String {
    "TrayBridge Demo".into()
}

fn default_recent() -> Vec<String> {
    vec!["notes.txt".into(), "report.pdf".into()]
}

fn default_max_recent() -> usize {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tooltip: default_tooltip(),
            helper_path: None,
            icon_png: None,
            icon_ico: None,
            recent: default_recent(),
            max_recent: default_max_recent(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`, or creates a default file there if
    /// it does not exist yet.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Saves the configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the platform-specific configuration file path.
pub fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("traybridge")
            .join("demo.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("traybridge").join("demo.toml"))
    }

    #[cfg(target_os = "macos")]
    {
        let home = std::env::var("HOME")?;
        Ok(PathBuf::from(home)
            .join("Library")
            .join("Application Support")
            .join("traybridge")
            .join("demo.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        Ok(PathBuf::from("/tmp/traybridge/demo.toml"))
    }
}
