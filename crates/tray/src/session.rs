//! Session lifecycle state machine.
//!
//! ```text
//! Spawning --ready--> Ready --quit--> Closing
//!     |                 |                |
//!     +-----------------+--process exit--+--> Closed
//! ```
//!
//! Every outbound line passes through [`Session::send`], which checks the
//! state and enqueues under one lock. Outbound order therefore equals call
//! order, and nothing is queued once `Closing` has begun.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace};
use traybridge_protocol::{HostMessage, WireMessage, encode_line};

use crate::error::TrayError;

/// Lifecycle state of the helper session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Process launched, no `ready` received yet.
    Spawning,
    /// Helper signaled readiness; outbound operations are permitted.
    Ready,
    /// `quit` was sent; waiting for the process to exit.
    Closing,
    /// Process exited. Terminal.
    Closed,
}

/// Who is sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SendMode {
    /// Host-issued calls; only legal in `Ready`.
    Host,
    /// The pending icon and first menu applied while handling `ready`.
    Startup,
}

/// Snapshot published to [`Tray::ready`](crate::Tray::ready) and
/// [`Tray::closed`](crate::Tray::closed) waiters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Lifecycle {
    pub ready: bool,
    pub closed: bool,
    pub code: Option<i32>,
}

/// Returns whether a send is legal in the given state.
pub(crate) fn check_outbound(state: SessionState, mode: SendMode) -> Result<(), TrayError> {
    match (state, mode) {
        (SessionState::Ready, _) | (SessionState::Spawning, SendMode::Startup) => Ok(()),
        (SessionState::Spawning, SendMode::Host) => Err(TrayError::NotReady),
        (SessionState::Closing, _) => Err(TrayError::Closing),
        (SessionState::Closed, _) => Err(TrayError::Closed),
    }
}

/// Owns the lifecycle state and the outbound queue of one helper.
pub(crate) struct Session {
    state: Mutex<SessionState>,
    write_tx: mpsc::UnboundedSender<String>,
    lifecycle: watch::Sender<Lifecycle>,
}

impl Session {
    pub fn new(write_tx: mpsc::UnboundedSender<String>) -> Self {
        let (lifecycle, _) = watch::channel(Lifecycle::default());
        Self {
            state: Mutex::new(SessionState::Spawning),
            write_tx,
            lifecycle,
        }
    }

    pub fn state(&self) -> SessionState {
        *self.lock()
    }

    /// Encodes and enqueues a message if the current state allows it.
    pub fn send(&self, msg: &HostMessage, mode: SendMode) -> Result<(), TrayError> {
        let line = encode_line(msg)?;
        let state = self.lock();
        check_outbound(*state, mode)?;
        self.enqueue(line);
        trace!(method = %msg.method(), ?mode, "queued message");
        Ok(())
    }

    /// Sends `quit` and enters `Closing`. Accepted before `ready` too.
    pub fn quit(&self) -> Result<(), TrayError> {
        let line = encode_line(&HostMessage::Quit)?;
        let mut state = self.lock();
        match *state {
            SessionState::Spawning | SessionState::Ready => {}
            SessionState::Closing => return Err(TrayError::Closing),
            SessionState::Closed => return Err(TrayError::Closed),
        }
        *state = SessionState::Closing;
        self.enqueue(line);
        info!("tray quit requested");
        Ok(())
    }

    /// `Spawning -> Ready`. Returns `false` (and changes nothing) from any
    /// other state.
    pub fn mark_ready(&self) -> bool {
        {
            let mut state = self.lock();
            if *state != SessionState::Spawning {
                return false;
            }
            *state = SessionState::Ready;
        }
        self.lifecycle.send_modify(|l| l.ready = true);
        true
    }

    /// Any state `-> Closed`, publishing the exit code.
    pub fn mark_closed(&self, code: Option<i32>) {
        *self.lock() = SessionState::Closed;
        self.lifecycle.send_modify(|l| {
            l.closed = true;
            l.code = code;
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<Lifecycle> {
        self.lifecycle.subscribe()
    }

    fn enqueue(&self, line: String) {
        // A gone write pump means the helper's stdin is closed; the call
        // is treated as silently rejected.
        if self.write_tx.send(line).is_err() {
            debug!("tray helper stdin closed, dropping message");
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
