//! Public configuration types for the tray controller.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;

use futures_util::future::BoxFuture;
use traybridge_protocol::{Icon, MenuItem, ProtocolError};

use crate::tray::Tray;

/// Callback invoked with the id of a clicked menu item.
///
/// Receives the tray so handlers can react directly (e.g. call
/// [`Tray::quit`]).
pub type ClickCallback = Box<dyn Fn(&Tray, &str) + Send + Sync>;

/// Produces the current menu whenever the helper asks for one.
pub type MenuProvider = Box<dyn Fn() -> BoxFuture<'static, Vec<MenuItem>> + Send + Sync>;

/// Callback for inbound lines that were rejected and skipped.
pub type ProtocolErrorCallback = Box<dyn Fn(&ProtocolError) + Send + Sync>;

/// Options for [`Tray::new`], given once at construction.
#[derive(Default)]
pub struct TrayOptions {
    /// Icon applied as soon as the helper reports ready.
    pub icon: Option<Icon>,
    /// Initial tooltip, passed as the helper's startup argument.
    pub tooltip: Option<String>,
    /// Helper executable overriding the platform lookup.
    pub helper_path: Option<PathBuf>,
    pub(crate) menu_provider: Option<MenuProvider>,
    pub(crate) click_handler: Option<ClickCallback>,
    pub(crate) error_handler: Option<ProtocolErrorCallback>,
}

impl TrayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_helper_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.helper_path = Some(path.into());
        self
    }

    /// Sets the menu provider. It may be async and is awaited before the
    /// resulting `setMenu` is sent.
    pub fn on_menu_requested<F, Fut>(mut self, provider: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Vec<MenuItem>> + Send + 'static,
    {
        self.menu_provider = Some(Box::new(move || Box::pin(provider())));
        self
    }

    pub fn on_clicked<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Tray, &str) + Send + Sync + 'static,
    {
        self.click_handler = Some(Box::new(handler));
        self
    }

    pub fn on_protocol_error<F>(mut self, handler: F) -> Self
    where
        F: Fn(&ProtocolError) + Send + Sync + 'static,
    {
        self.error_handler = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for TrayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrayOptions")
            .field("icon", &self.icon)
            .field("tooltip", &self.tooltip)
            .field("helper_path", &self.helper_path)
            .field("menu_provider", &self.menu_provider.is_some())
            .field("click_handler", &self.click_handler.is_some())
            .field("error_handler", &self.error_handler.is_some())
            .finish()
    }
}
