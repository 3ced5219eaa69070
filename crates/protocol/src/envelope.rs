use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::constants::{MAX_LINE_LEN, Method};
use crate::error::ProtocolError;

/// Envelope for every line on the wire.
///
/// The `params` field uses `serde_json::value::RawValue` so the method can be
/// resolved before the parameters are decoded into a concrete type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Box<serde_json::value::RawValue>>,
}

impl Envelope {
    /// Creates an envelope with the given method and params.
    pub fn new<T: Serialize>(method: Method, params: Option<&T>) -> Result<Self, serde_json::Error> {
        let raw = match params {
            Some(p) => Some(serde_json::value::to_raw_value(p)?),
            None => None,
        };
        Ok(Self {
            method: method.as_str().to_string(),
            params: raw,
        })
    }

    /// Resolves the method name against the known method table.
    pub fn method(&self) -> Result<Method, ProtocolError> {
        self.method.parse()
    }

    /// Deserializes the params into the given type.
    pub fn parse_params<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        match &self.params {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }

    /// Deserializes params that the method requires.
    pub(crate) fn required_params<T: DeserializeOwned>(
        &self,
        method: Method,
    ) -> Result<T, ProtocolError> {
        self.parse_params()
            .map_err(|source| ProtocolError::InvalidParams { method, source })?
            .ok_or(ProtocolError::MissingParams(method))
    }
}

/// A typed message that maps onto an [`Envelope`].
pub trait WireMessage: Sized {
    /// Returns the protocol method of this message.
    fn method(&self) -> Method;

    /// Builds the envelope for this message.
    fn to_envelope(&self) -> Result<Envelope, ProtocolError>;

    /// Decodes a message from an envelope, rejecting methods that do not
    /// belong to this direction.
    fn from_envelope(envelope: &Envelope) -> Result<Self, ProtocolError>;
}

/// Encodes a message as one JSON line, including the trailing `\n`.
///
/// JSON string escaping guarantees the encoded text contains no other newline.
pub fn encode_line<M: WireMessage>(msg: &M) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(&msg.to_envelope()?)?;
    line.push('\n');
    Ok(line)
}

/// Decodes one line (with or without its line terminator) into a message.
pub fn decode_line<M: WireMessage>(line: &str) -> Result<M, ProtocolError> {
    let line = line.trim_end_matches(['\n', '\r']);
    if line.len() > MAX_LINE_LEN {
        return Err(ProtocolError::LineTooLong(line.len()));
    }
    let envelope: Envelope = serde_json::from_str(line)?;
    M::from_envelope(&envelope)
}
