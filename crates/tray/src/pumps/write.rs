//! Helper stdin write pump, the single writer of outbound lines.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Writes queued lines to the helper's stdin, flushing after each one.
///
/// On cancellation, lines already queued are still written before stdin is
/// shut down; a helper sees EOF once this returns.
pub(crate) async fn write_pump<W>(
    mut writer: W,
    mut write_rx: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
) where
    W: AsyncWrite + Unpin,
{
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                while let Ok(line) = write_rx.try_recv() {
                    if let Err(e) = write_line(&mut writer, &line).await {
                        debug!("dropping queued lines after write error: {e}");
                        break;
                    }
                }
                break;
            }
            line = write_rx.recv() => {
                match line {
                    Some(line) => {
                        if let Err(e) = write_line(&mut writer, &line).await {
                            warn!("tray helper write error: {e}");
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    let _ = writer.shutdown().await;
}

async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}
