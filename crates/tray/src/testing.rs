//! In-memory helper double for controller tests.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::oneshot;
use traybridge_protocol::{HelperMessage, HostMessage, decode_line, encode_line};

use crate::transport::Transport;
use crate::tray::Tray;
use crate::types::TrayOptions;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE: Duration = Duration::from_millis(200);
const PIPE_CAPACITY: usize = 64 * 1024;

/// The helper end of a [`Tray`] running over in-memory pipes.
pub(crate) struct FakeHelper {
    stdin: BufReader<DuplexStream>,
    stdout: DuplexStream,
    exit_tx: oneshot::Sender<Option<i32>>,
}

impl FakeHelper {
    pub fn start(options: TrayOptions) -> (Tray, FakeHelper) {
        let (host_out, helper_in) = tokio::io::duplex(PIPE_CAPACITY);
        let (helper_out, host_in) = tokio::io::duplex(PIPE_CAPACITY);
        let (exit_tx, exit_rx) = oneshot::channel();

        let transport = Transport::new(host_in, host_out, async move {
            exit_rx.await.ok().flatten()
        });
        let tray = Tray::with_transport(transport, options);
        let helper = FakeHelper {
            stdin: BufReader::new(helper_in),
            stdout: helper_out,
            exit_tx,
        };
        (tray, helper)
    }

    pub async fn send(&mut self, msg: HelperMessage) {
        let line = encode_line(&msg).unwrap();
        self.send_raw(&line).await;
    }

    pub async fn send_raw(&mut self, line: &str) {
        self.stdout.write_all(line.as_bytes()).await.unwrap();
        self.stdout.flush().await.unwrap();
    }

    /// Next line written by the host, decoded.
    pub async fn recv(&mut self) -> HostMessage {
        let mut line = String::new();
        let n = tokio::time::timeout(RECV_TIMEOUT, self.stdin.read_line(&mut line))
            .await
            .expect("timed out waiting for host message")
            .unwrap();
        assert!(n > 0, "host closed stdin");
        decode_line(&line).unwrap()
    }

    /// Asserts the host writes nothing for a short while.
    pub async fn expect_silence(&mut self) {
        let mut line = String::new();
        if let Ok(Ok(n)) = tokio::time::timeout(SILENCE, self.stdin.read_line(&mut line)).await {
            assert_eq!(n, 0, "unexpected host message: {line}");
        }
    }

    pub async fn expect_eof(&mut self) {
        let mut line = String::new();
        let n = tokio::time::timeout(RECV_TIMEOUT, self.stdin.read_line(&mut line))
            .await
            .expect("host never closed stdin")
            .unwrap();
        assert_eq!(n, 0, "unexpected host message: {line}");
    }

    /// Closes stdout, then reports the process as exited with `code`.
    pub async fn exit(mut self, code: Option<i32>) {
        self.stdout.shutdown().await.unwrap();
        drop(self.stdout);
        let _ = self.exit_tx.send(code);
    }
}

/// Polls `cond` until it holds, panicking after a few seconds.
pub(crate) async fn eventually(mut cond: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    while !cond() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met in time"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
