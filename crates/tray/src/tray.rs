//! Tray controller, the host-facing handle over one helper session.
//!
//! Each `Tray` runs five tasks:
//! - read pump: drains the helper's stdout for the whole session
//! - write pump: sole writer of the helper's stdin
//! - dispatcher: handles decoded messages one at a time, in arrival order
//! - refresher: runs menu refreshes requested after startup, one at a time
//! - supervisor: waits for the helper to exit and closes the session
//!
//! Refresh requests that arrive while a refresh is running collapse into a
//! single follow-up refresh.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use traybridge_protocol::messages::ClickedParams;
use traybridge_protocol::{
    HelperMessage, HostMessage, Icon, IconFormat, MenuItem, ProtocolError, WireMessage,
    validate_menu,
};

use crate::error::TrayError;
use crate::platform;
use crate::pumps::read::{Inbound, read_pump};
use crate::pumps::write::write_pump;
use crate::session::{SendMode, Session, SessionState};
use crate::transport::{ExitFuture, Transport};
use crate::types::{ClickCallback, MenuProvider, ProtocolErrorCallback, TrayOptions};

/// How long to keep reading the helper's stdout after it exited.
const READER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Handle to a running tray helper.
///
/// Cheap to clone; all clones drive the same helper. Dropping the last
/// clone closes the helper's stdin, which makes the helper exit.
#[derive(Clone)]
pub struct Tray {
    inner: Arc<Inner>,
}

struct Inner {
    session: Arc<Session>,
    icon_format: IconFormat,
    pending_icon: Mutex<Option<Icon>>,
    menu_provider: Option<MenuProvider>,
    click_handler: Option<ClickCallback>,
    error_handler: Option<ProtocolErrorCallback>,
    refresh: Arc<Notify>,
    shutdown: CancellationToken,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl Tray {
    /// Resolves and spawns the platform helper, then starts the session.
    ///
    /// Returns before the helper reports ready; await [`Tray::ready`] for
    /// that. Must be called from within a Tokio runtime.
    pub fn new(options: TrayOptions) -> Result<Self, TrayError> {
        let path = platform::resolve_helper_path(options.helper_path.as_deref())?;
        let transport = Transport::spawn(&path, options.tooltip.as_deref())?;
        info!(path = %path.display(), "tray helper started");
        Ok(Self::with_transport(transport, options))
    }

    /// Starts a session over an already established transport.
    ///
    /// `options.tooltip` and `options.helper_path` are not used here; they
    /// only affect how [`Tray::new`] launches the helper.
    pub fn with_transport(transport: Transport, options: TrayOptions) -> Self {
        let Transport {
            reader,
            writer,
            exit,
        } = transport;
        let TrayOptions {
            icon,
            menu_provider,
            click_handler,
            error_handler,
            ..
        } = options;

        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let session = Arc::new(Session::new(write_tx));
        let refresh = Arc::new(Notify::new());
        let shutdown = CancellationToken::new();

        let inner = Arc::new(Inner {
            session: Arc::clone(&session),
            icon_format: IconFormat::current(),
            pending_icon: Mutex::new(icon),
            menu_provider,
            click_handler,
            error_handler,
            refresh: Arc::clone(&refresh),
            shutdown: shutdown.clone(),
        });
        let weak = Arc::downgrade(&inner);

        tokio::spawn(write_pump(writer, write_rx, shutdown.clone()));
        let reader_handle = tokio::spawn(read_pump(reader, inbound_tx));
        tokio::spawn(dispatch_loop(weak.clone(), inbound_rx));
        tokio::spawn(refresh_loop(weak, refresh, shutdown.clone()));
        tokio::spawn(supervise(exit, reader_handle, session, shutdown));

        Self { inner }
    }

    /// Replaces the tray icon with the buffer matching this platform.
    pub fn set_icon(&self, icon: &Icon) -> Result<(), TrayError> {
        let msg = HostMessage::set_icon(icon, self.inner.icon_format);
        self.inner.session.send(&msg, SendMode::Host)
    }

    /// Replaces the whole menu.
    pub fn set_menu(&self, items: Vec<MenuItem>) -> Result<(), TrayError> {
        validate_menu(&items)?;
        self.inner
            .session
            .send(&HostMessage::set_menu(items), SendMode::Host)
    }

    pub fn set_tooltip(&self, text: impl Into<String>) -> Result<(), TrayError> {
        self.inner
            .session
            .send(&HostMessage::set_tooltip(text), SendMode::Host)
    }

    /// Asks the helper to shut down. Every later outbound call is rejected,
    /// including menus from provider calls still in flight.
    pub fn quit(&self) -> Result<(), TrayError> {
        self.inner.session.quit()
    }

    pub fn state(&self) -> SessionState {
        self.inner.session.state()
    }

    /// Resolves once the helper is ready and the initial icon and menu have
    /// been queued. Fails with [`TrayError::Exited`] if the helper exits
    /// first.
    pub async fn ready(&self) -> Result<(), TrayError> {
        let mut rx = self.inner.session.subscribe();
        let (ready, code) = {
            let lifecycle = rx
                .wait_for(|l| l.ready || l.closed)
                .await
                .map_err(|_| TrayError::Closed)?;
            (lifecycle.ready, lifecycle.code)
        };
        if ready {
            Ok(())
        } else {
            Err(TrayError::Exited { code })
        }
    }

    /// Resolves once the helper process has exited, with its exit code.
    pub async fn closed(&self) -> Option<i32> {
        let mut rx = self.inner.session.subscribe();
        rx.wait_for(|l| l.closed).await.ok().and_then(|l| l.code)
    }

    async fn handle_message(&self, msg: HelperMessage) {
        trace!(method = %msg.method(), "dispatching message");
        match msg {
            HelperMessage::Ready => self.handle_ready().await,
            HelperMessage::MenuRequested => self.handle_menu_requested(),
            HelperMessage::Clicked(ClickedParams { id }) => self.handle_clicked(&id),
        }
    }

    async fn handle_ready(&self) {
        let session = &self.inner.session;
        match session.state() {
            SessionState::Spawning => {}
            SessionState::Ready => {
                warn!("duplicate ready from tray helper, ignoring");
                return;
            }
            SessionState::Closing | SessionState::Closed => {
                debug!("ready after quit, skipping startup");
                return;
            }
        }

        let icon = self
            .inner
            .pending_icon
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(icon) = icon {
            let msg = HostMessage::set_icon(&icon, self.inner.icon_format);
            if let Err(e) = session.send(&msg, SendMode::Startup) {
                debug!("initial icon dropped: {e}");
            }
        }

        self.refresh_menu(SendMode::Startup).await;

        if session.mark_ready() {
            info!("tray ready");
        }
    }

    fn handle_menu_requested(&self) {
        if self.inner.menu_provider.is_none() {
            trace!("menu requested without a provider, keeping current menu");
            return;
        }
        if self.state() != SessionState::Ready {
            debug!(state = ?self.state(), "menu requested outside ready, ignoring");
            return;
        }
        self.inner.refresh.notify_one();
    }

    fn handle_clicked(&self, id: &str) {
        debug!(id, "menu item clicked");
        if let Some(handler) = &self.inner.click_handler {
            handler(self, id);
        }
    }

    fn report_protocol_error(&self, err: &ProtocolError) {
        warn!("skipping line from tray helper: {err}");
        if let Some(handler) = &self.inner.error_handler {
            handler(err);
        }
    }

    /// Awaits the menu provider and sends its result. No provider, no send.
    async fn refresh_menu(&self, mode: SendMode) {
        let Some(provider) = &self.inner.menu_provider else {
            return;
        };
        let items = provider().await;
        if let Err(e) = validate_menu(&items) {
            warn!("menu provider returned an invalid menu: {e}");
            return;
        }
        if let Err(e) = self
            .inner
            .session
            .send(&HostMessage::set_menu(items), mode)
        {
            debug!("menu refresh dropped: {e}");
        }
    }
}

impl fmt::Debug for Tray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tray")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Handles decoded lines in arrival order until the reader stops or the
/// last `Tray` is dropped.
async fn dispatch_loop(weak: Weak<Inner>, mut inbound_rx: mpsc::UnboundedReceiver<Inbound>) {
    while let Some(inbound) = inbound_rx.recv().await {
        let Some(inner) = weak.upgrade() else { break };
        let tray = Tray { inner };
        match inbound {
            Ok(msg) => tray.handle_message(msg).await,
            Err(e) => tray.report_protocol_error(&e),
        }
    }
    trace!("dispatcher stopped");
}

/// Runs one menu refresh per wakeup. Wakeups sent while a refresh is
/// running are stored as a single permit.
async fn refresh_loop(weak: Weak<Inner>, refresh: Arc<Notify>, shutdown: CancellationToken) {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            () = refresh.notified() => {
                let Some(inner) = weak.upgrade() else { break };
                Tray { inner }.refresh_menu(SendMode::Host).await;
            }
        }
    }
    trace!("refresher stopped");
}

/// Waits for the helper to exit, lets the reader drain, then closes the
/// session and stops the remaining tasks.
async fn supervise(
    exit: ExitFuture,
    mut reader: JoinHandle<()>,
    session: Arc<Session>,
    shutdown: CancellationToken,
) {
    let code = exit.await;
    if tokio::time::timeout(READER_DRAIN_TIMEOUT, &mut reader)
        .await
        .is_err()
    {
        debug!("tray helper stdout still open after exit, abandoning it");
        reader.abort();
    }

    session.mark_closed(code);
    shutdown.cancel();
    info!(code = ?code, "tray helper exited");
}
