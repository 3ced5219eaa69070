//! Background tasks moving lines between the session and the helper.

pub(crate) mod read;
pub(crate) mod write;
