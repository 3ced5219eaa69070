//! Tray icon payloads.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};

/// Image format the helper expects on a given platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFormat {
    /// Raster image, used where the tray renders images directly.
    Png,
    /// Multi-resolution icon container, required on Windows.
    Ico,
}

impl IconFormat {
    /// Returns the format for an OS name as reported by `std::env::consts::OS`.
    pub fn for_os(os: &str) -> Self {
        if os == "windows" {
            IconFormat::Ico
        } else {
            IconFormat::Png
        }
    }

    /// Returns the format for the platform this binary was built for.
    pub fn current() -> Self {
        Self::for_os(std::env::consts::OS)
    }
}

/// A platform-agnostic icon: both encodings of the same artwork.
///
/// The buffers are opaque; exactly one of them is sent, picked by
/// [`IconFormat`] at send time.
#[derive(Clone, PartialEq, Eq)]
pub struct Icon {
    pub png: Vec<u8>,
    pub ico: Vec<u8>,
}

impl Icon {
    pub fn new(png: impl Into<Vec<u8>>, ico: impl Into<Vec<u8>>) -> Self {
        Self {
            png: png.into(),
            ico: ico.into(),
        }
    }

    /// Returns the buffer for the given format.
    pub fn select(&self, format: IconFormat) -> &[u8] {
        match format {
            IconFormat::Png => &self.png,
            IconFormat::Ico => &self.ico,
        }
    }

    /// Returns the selected buffer base64-encoded for the `setIcon` message.
    pub fn to_base64(&self, format: IconFormat) -> String {
        STANDARD.encode(self.select(format))
    }
}

// Raw image bytes make useless debug output.
impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Icon")
            .field("png_len", &self.png.len())
            .field("ico_len", &self.ico.len())
            .finish()
    }
}
