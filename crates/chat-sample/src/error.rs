//! # Messenger Errors
//!
//! One error enum for the sample client. Toolkit failures pass through
//! unchanged; the client adds only the failure modes of its own layer.

use chat_model::ModelError;

/// Errors surfaced by the sample messenger client.
#[derive(Debug, thiserror::Error)]
pub enum MessengerError {
    /// A toolkit-level failure: bad construction arguments, an unknown
    /// accessor, a directory miss.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A history payload that is not a JSON object.
    #[error("Malformed history payload: {0}")]
    MalformedPayload(String),
}
