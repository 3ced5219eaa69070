//! Wire protocol between a host application and its tray helper process.
//!
//! Every message is one JSON object on its own line:
//! `{"method": "...", "params": {...}}`. The host drives the helper with
//! [`HostMessage`]s and receives [`HelperMessage`]s back.

pub mod constants;
pub mod envelope;
pub mod error;
pub mod icon;
pub mod menu;
pub mod messages;

// Re-export primary types for convenience.
pub use constants::Method;
pub use envelope::{Envelope, WireMessage, decode_line, encode_line};
pub use error::ProtocolError;
pub use icon::{Icon, IconFormat};
pub use menu::{MenuError, MenuItem, MenuRole, find_item, validate_menu};
pub use messages::{HelperMessage, HostMessage};
