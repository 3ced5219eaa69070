use std::fmt;
use std::str::FromStr;

use crate::error::ProtocolError;

/// Maximum length of a single inbound line (16 MB).
///
/// Icons travel host to helper, so helper lines are tiny; anything this
/// large is a misbehaving peer.
pub const MAX_LINE_LEN: usize = 16 * 1024 * 1024;

/// Helper command-line flag carrying the initial tooltip.
pub const TOOLTIP_ARG: &str = "--tooltip";

/// Protocol method identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    // Host -> helper
    SetIcon,
    SetMenu,
    SetTooltip,
    Quit,

    // Helper -> host
    Ready,
    MenuRequested,
    Clicked,
}

impl Method {
    /// All known methods, host-bound first.
    pub const ALL: [Method; 7] = [
        Method::SetIcon,
        Method::SetMenu,
        Method::SetTooltip,
        Method::Quit,
        Method::Ready,
        Method::MenuRequested,
        Method::Clicked,
    ];

    /// Returns the wire name of this method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::SetIcon => "setIcon",
            Method::SetMenu => "setMenu",
            Method::SetTooltip => "setTooltip",
            Method::Quit => "quit",
            Method::Ready => "ready",
            Method::MenuRequested => "menuRequested",
            Method::Clicked => "clicked",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownMethod(s.to_string()))
    }
}
