//! Helper stdout read pump: splits lines and decodes them.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};
use traybridge_protocol::constants::MAX_LINE_LEN;
use traybridge_protocol::{HelperMessage, ProtocolError, WireMessage, decode_line};

/// One decoded line, or the reason it was rejected.
pub(crate) type Inbound = Result<HelperMessage, ProtocolError>;

/// Reads the helper's stdout until EOF, forwarding every non-empty line in
/// arrival order.
///
/// Never waits on message handling: lines are handed to an unbounded queue,
/// and keep being drained even after the dispatcher has gone away so the
/// helper never blocks on a full pipe.
pub(crate) async fn read_pump<R>(reader: R, inbound_tx: mpsc::UnboundedSender<Inbound>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let limit = MAX_LINE_LEN as u64 + 1;
        let n = match (&mut reader).take(limit).read_until(b'\n', &mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("tray helper read error: {e}");
                break;
            }
        };
        if n == 0 {
            debug!("tray helper stdout closed");
            break;
        }

        let inbound = if buf.last() != Some(&b'\n') && buf.len() > MAX_LINE_LEN {
            match discard_rest_of_line(&mut reader).await {
                Ok(skipped) => Err(ProtocolError::LineTooLong(buf.len() + skipped)),
                Err(e) => {
                    warn!("tray helper read error: {e}");
                    break;
                }
            }
        } else {
            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }
            decode_line::<HelperMessage>(&line)
        };

        match &inbound {
            Ok(msg) => trace!(method = %msg.method(), "received message"),
            Err(e) => debug!("rejected line from tray helper: {e}"),
        }
        let _ = inbound_tx.send(inbound);
    }
}

/// Skips input up to and including the next newline. Returns the number of
/// bytes skipped.
async fn discard_rest_of_line<R>(reader: &mut R) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut skipped = 0;
    loop {
        let (consumed, done) = {
            let chunk = reader.fill_buf().await?;
            if chunk.is_empty() {
                return Ok(skipped);
            }
            match chunk.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (chunk.len(), false),
            }
        };
        reader.consume(consumed);
        skipped += consumed;
        if done {
            return Ok(skipped);
        }
    }
}
