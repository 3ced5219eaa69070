//! Error types for the tray controller.

use std::path::PathBuf;

use traybridge_protocol::{MenuError, ProtocolError};

/// Errors produced by [`Tray`](crate::Tray).
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("no tray helper for platform {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("failed to spawn tray helper {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("tray helper {0} was not captured")]
    MissingPipe(&'static str),

    #[error("tray is not ready")]
    NotReady,

    #[error("tray is closing")]
    Closing,

    #[error("tray is closed")]
    Closed,

    #[error("tray helper exited before ready (code {code:?})")]
    Exited { code: Option<i32> },

    #[error("invalid menu: {0}")]
    InvalidMenu(#[from] MenuError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}
