use std::error::Error as StdError;

use thiserror::Error;

/// Hush's crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Hush's crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// A pushed frame had more samples than the configured frame length.
    ///
    /// Short frames are zero-padded; long frames have no sane interpretation
    /// (which samples would we drop?), so we refuse them up front.
    #[error("frame has {got} samples but the configured frame length is {expected}")]
    FrameTooLong { got: usize, expected: usize },

    /// A class name was not present in the model vocabulary.
    #[error("label {0:?} is not in the model vocabulary")]
    UnknownLabel(String),

    /// An RTTM line could not be parsed.
    #[error("malformed RTTM line {line}: {reason}")]
    Rttm { line: usize, reason: String },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}
