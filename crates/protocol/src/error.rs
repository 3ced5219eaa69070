//! Protocol error types.

use crate::constants::Method;

/// Errors produced while encoding or decoding protocol lines.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("missing params for {0}")]
    MissingParams(Method),

    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        method: Method,
        #[source]
        source: serde_json::Error,
    },

    #[error("line too long: {0} bytes")]
    LineTooLong(usize),
}
