//! Error types for the record store

use std::io;

use thiserror::Error;

use super::codec::CodecError;

/// Coarse classification of a [`StoreError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed input, detected before any I/O
    InvalidArgument,
    /// The targeted record or file does not exist
    NotFound,
    /// An underlying I/O or decode failure
    Storage,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Record ids exhausted: {last} is the largest assignable id")]
    IdsExhausted { last: u64 },

    #[error("{context}")]
    Codec {
        context: String,
        #[source]
        source: CodecError,
    },
}

impl StoreError {
    /// Returns the kind of failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Io { .. } | StoreError::Codec { .. } | StoreError::IdsExhausted { .. } => {
                ErrorKind::Storage
            }
        }
    }

    /// Returns true for not-found failures
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Attaches a human-readable context to I/O results
pub(crate) trait IoContext<T> {
    fn io_context<F>(self, context: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> String;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<F>(self, context: F) -> Result<T, StoreError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| StoreError::Io {
            context: context(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn kinds_are_distinguished() {
        assert_eq!(
            StoreError::InvalidArgument("x".into()).kind(),
            ErrorKind::InvalidArgument
        );
        assert!(StoreError::NotFound("Record not found: 1".into()).is_not_found());

        let io = StoreError::Io {
            context: "Failed to read".into(),
            source: io::Error::other("disk gone"),
        };
        assert_eq!(io.kind(), ErrorKind::Storage);
        assert!(!io.is_not_found());
    }

    #[test]
    fn io_context_keeps_source() {
        let result: io::Result<()> = Err(io::Error::other("disk gone"));
        let err = result
            .io_context(|| "Failed to open record file".to_string())
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to open record file");
        assert_eq!(err.source().unwrap().to_string(), "disk gone");
    }
}
