//! Client side of the tray helper protocol.
//!
//! A [`Tray`] spawns the platform helper executable, talks to it over its
//! stdin/stdout with one JSON object per line, and turns helper
//! notifications into host callbacks:
//! - `ready`: the pending icon and the first menu are sent, then
//!   [`Tray::ready`] resolves
//! - `menuRequested`: the host's menu provider is awaited and its result
//!   sent as `setMenu`
//! - `clicked`: the host's click callback runs with the item id
//!
//! The helper itself (icon and menu rendering) lives outside this crate.
//! One `Tray` owns one helper process; there is no restart.

pub mod error;
pub mod platform;
mod pumps;
pub mod session;
#[cfg(test)]
mod testing;
pub mod transport;
pub mod tray;
pub mod types;

pub use error::TrayError;
pub use session::SessionState;
pub use transport::Transport;
pub use tray::Tray;
pub use types::{ClickCallback, MenuProvider, ProtocolErrorCallback, TrayOptions};

pub use traybridge_protocol::{
    Icon, IconFormat, MenuError, MenuItem, MenuRole, ProtocolError, find_item, validate_menu,
};
