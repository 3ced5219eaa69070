use serde::{Deserialize, Serialize};

use crate::constants::Method;
use crate::envelope::{Envelope, WireMessage};
use crate::error::ProtocolError;
use crate::icon::{Icon, IconFormat};
use crate::menu::MenuItem;

// ---------------------------------------------------------------------------
// Params
// ---------------------------------------------------------------------------

/// Replaces the tray icon. `base64` is the platform-selected icon buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetIconParams {
    pub base64: String,
}

/// Replaces the whole menu tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMenuParams {
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetTooltipParams {
    pub text: String,
}

/// The user activated the menu item with this id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickedParams {
    pub id: String,
}

/// Params of methods that carry none; encodes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyParams {}

// ---------------------------------------------------------------------------
// Host -> helper
// ---------------------------------------------------------------------------

/// Messages the host writes to the helper's stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMessage {
    SetIcon(SetIconParams),
    SetMenu(SetMenuParams),
    SetTooltip(SetTooltipParams),
    Quit,
}

impl HostMessage {
    pub fn set_icon(icon: &Icon, format: IconFormat) -> Self {
        HostMessage::SetIcon(SetIconParams {
            base64: icon.to_base64(format),
        })
    }

    pub fn set_menu(items: Vec<MenuItem>) -> Self {
        HostMessage::SetMenu(SetMenuParams { items })
    }

    pub fn set_tooltip(text: impl Into<String>) -> Self {
        HostMessage::SetTooltip(SetTooltipParams { text: text.into() })
    }
}

impl WireMessage for HostMessage {
    fn method(&self) -> Method {
        match self {
            HostMessage::SetIcon(_) => Method::SetIcon,
            HostMessage::SetMenu(_) => Method::SetMenu,
            HostMessage::SetTooltip(_) => Method::SetTooltip,
            HostMessage::Quit => Method::Quit,
        }
    }

    fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        let method = self.method();
        let envelope = match self {
            HostMessage::SetIcon(p) => Envelope::new(method, Some(p))?,
            HostMessage::SetMenu(p) => Envelope::new(method, Some(p))?,
            HostMessage::SetTooltip(p) => Envelope::new(method, Some(p))?,
            HostMessage::Quit => Envelope::new(method, Some(&EmptyParams {}))?,
        };
        Ok(envelope)
    }

    fn from_envelope(envelope: &Envelope) -> Result<Self, ProtocolError> {
        let method = envelope.method()?;
        match method {
            Method::SetIcon => Ok(HostMessage::SetIcon(envelope.required_params(method)?)),
            Method::SetMenu => Ok(HostMessage::SetMenu(envelope.required_params(method)?)),
            Method::SetTooltip => Ok(HostMessage::SetTooltip(envelope.required_params(method)?)),
            Method::Quit => Ok(HostMessage::Quit),
            _ => Err(ProtocolError::UnknownMethod(envelope.method.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Helper -> host
// ---------------------------------------------------------------------------

/// Notifications the helper writes to its stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperMessage {
    /// Helper initialized and the tray icon is visible.
    Ready,
    /// Helper is about to show the menu and wants fresh content.
    MenuRequested,
    Clicked(ClickedParams),
}

impl HelperMessage {
    pub fn clicked(id: impl Into<String>) -> Self {
        HelperMessage::Clicked(ClickedParams { id: id.into() })
    }
}

impl WireMessage for HelperMessage {
    fn method(&self) -> Method {
        match self {
            HelperMessage::Ready => Method::Ready,
            HelperMessage::MenuRequested => Method::MenuRequested,
            HelperMessage::Clicked(_) => Method::Clicked,
        }
    }

    fn to_envelope(&self) -> Result<Envelope, ProtocolError> {
        let method = self.method();
        let envelope = match self {
            HelperMessage::Clicked(p) => Envelope::new(method, Some(p))?,
            _ => Envelope::new(method, Some(&EmptyParams {}))?,
        };
        Ok(envelope)
    }

    fn from_envelope(envelope: &Envelope) -> Result<Self, ProtocolError> {
        let method = envelope.method()?;
        // Parameterless notifications tolerate missing or extra params.
        match method {
            Method::Ready => Ok(HelperMessage::Ready),
            Method::MenuRequested => Ok(HelperMessage::MenuRequested),
            Method::Clicked => Ok(HelperMessage::Clicked(envelope.required_params(method)?)),
            _ => Err(ProtocolError::UnknownMethod(envelope.method.clone())),
        }
    }
}
