//! Error types for catalog decoding, name resolution and loading.
//!
//! | Variant | Raised by |
//! |---------|-----------|
//! | [`Format`](CatalogError::Format) | decoder, first mismatching magic/version byte |
//! | [`Truncated`](CatalogError::Truncated) | decoder, buffer shorter than the declared records |
//! | [`InvalidState`](CatalogError::InvalidState) | [`Catalog::read_names`](crate::Catalog::read_names) on an empty catalog |
//! | [`Fetch`](CatalogError::Fetch) | [`CatalogLoader`](crate::CatalogLoader) network failures |
//! | [`Io`](CatalogError::Io) | [`Catalog::open`](crate::Catalog::open) |

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog header at byte {offset}: expected {expected:#04x}, got {actual:#04x}")]
    Format {
        offset: usize,
        expected: u8,
        actual: u8,
    },

    #[error("Catalog truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("Invalid catalog state: {message}")]
    InvalidState { message: String },

    #[error("Failed to fetch {resource}: {message}")]
    Fetch { resource: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    pub fn fetch(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            resource: resource.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn format_display() {
        let err = CatalogError::Format {
            offset: 0,
            expected: b'C',
            actual: b'X',
        };
        assert_eq!(
            err.to_string(),
            "Invalid catalog header at byte 0: expected 0x43, got 0x58"
        );
    }

    #[test]
    fn truncated_display() {
        let err = CatalogError::Truncated {
            expected: 54,
            actual: 40,
        };
        assert_eq!(err.to_string(), "Catalog truncated: expected 54 bytes, got 40");
    }

    #[test]
    fn invalid_state_display() {
        let err = CatalogError::invalid_state("no stars loaded");
        assert_eq!(err.to_string(), "Invalid catalog state: no stars loaded");
    }

    #[test]
    fn fetch_display() {
        let err = CatalogError::fetch("stars.dat", "HTTP status 404 Not Found");
        assert_eq!(
            err.to_string(),
            "Failed to fetch stars.dat: HTTP status 404 Not Found"
        );
    }

    #[test]
    fn io_error_conversion() {
        let err = CatalogError::from(IoError::new(ErrorKind::NotFound, "no such file"));
        match err {
            CatalogError::Io(ref inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
            _ => panic!("Expected Io variant"),
        }
        assert_eq!(err.to_string(), "I/O error: no such file");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CatalogError>();
    }
}
