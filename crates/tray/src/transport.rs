//! Byte streams a session runs over.

use std::future::Future;
use std::path::Path;
use std::process::Stdio;

use futures_util::future::BoxFuture;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;
use tracing::{debug, warn};
use traybridge_protocol::constants::TOOLTIP_ARG;

use crate::error::TrayError;

/// Resolves once the helper has terminated, with its exit code
/// (`None` when killed by a signal or when the code is unknown).
pub type ExitFuture = BoxFuture<'static, Option<i32>>;

/// The helper's output stream, its input stream, and its exit future.
///
/// Built from a spawned process by [`Transport::spawn`], or from arbitrary
/// streams with [`Transport::new`] (in-process helpers, test doubles).
pub struct Transport {
    pub(crate) reader: Box<dyn AsyncRead + Send + Unpin>,
    pub(crate) writer: Box<dyn AsyncWrite + Send + Unpin>,
    pub(crate) exit: ExitFuture,
}

impl Transport {
    /// Creates a transport from the helper's stdout, stdin, and exit future.
    pub fn new<R, W, F>(reader: R, writer: W, exit: F) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
        F: Future<Output = Option<i32>> + Send + 'static,
    {
        Self {
            reader: Box::new(reader),
            writer: Box::new(writer),
            exit: Box::pin(exit),
        }
    }

    /// Spawns the helper executable with stdin/stdout piped and stderr
    /// inherited. A non-empty `tooltip` is passed as the helper's startup argument.
    pub fn spawn(path: &Path, tooltip: Option<&str>) -> Result<Self, TrayError> {
        let mut cmd = Command::new(path);
        if let Some(text) = tooltip.filter(|t| !t.is_empty()) {
            cmd.arg(TOOLTIP_ARG).arg(text);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| TrayError::Spawn {
            path: path.to_path_buf(),
            source,
        })?;

        let stdin = child.stdin.take().ok_or(TrayError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(TrayError::MissingPipe("stdout"))?;
        debug!(pid = ?child.id(), path = %path.display(), "tray helper spawned");

        let exit = async move {
            match child.wait().await {
                Ok(status) => status.code(),
                Err(e) => {
                    warn!("failed to wait for tray helper: {e}");
                    None
                }
            }
        };

        Ok(Self::new(stdout, stdin, exit))
    }
}
