//! Error types for caption decoding.

use thiserror::Error;

/// Result type for caption decoding.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Failure to turn a captions payload into transcript units.
///
/// Every variant is recovered inside the caption pipeline; callers of
/// [`crate::captions::fetch_transcript`] only ever see an empty transcript.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("captions payload is empty")]
    Empty,

    #[error("caption request failed with HTTP {0}")]
    HttpStatus(u16),

    #[error("caption request failed: {0}")]
    Transport(String),

    #[error("captions payload contained no usable units")]
    NoUnits,
}

impl From<reqwest::Error> for DecodeError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => DecodeError::HttpStatus(status.as_u16()),
            None => DecodeError::Transport(err.to_string()),
        }
    }
}
