//! Read outcome codes for the simulated persistence layer.
//!
//! No real disk I/O happens anywhere in this crate, but the store still
//! reports read outcomes the way a file-backed store would: callers
//! configure the code to be returned, and `ReadError::None` means the
//! simulated read succeeded.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of a (simulated) read of the backing store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReadError {
    /// The read succeeded.
    None,
    /// The backing file does not exist.
    NoFile,
    /// The backing file exists but could not be parsed as JSON.
    JsonParse,
    /// The backing file could not be opened.
    AccessDenied,
    /// Any other failure.
    Other,
}

impl ReadError {
    /// Whether this code represents a successful read.
    pub fn is_success(&self) -> bool {
        matches!(self, ReadError::None)
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::None => write!(f, "no error"),
            ReadError::NoFile => write!(f, "backing file not found"),
            ReadError::JsonParse => write!(f, "backing file is not valid JSON"),
            ReadError::AccessDenied => write!(f, "access to backing file denied"),
            ReadError::Other => write!(f, "read failed"),
        }
    }
}

impl std::error::Error for ReadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_success() {
        assert!(ReadError::None.is_success());
        assert!(!ReadError::NoFile.is_success());
        assert!(!ReadError::Other.is_success());
    }

    #[test]
    fn serializes_snake_case() {
        let s = serde_json::to_string(&ReadError::NoFile).unwrap();
        assert_eq!(s, "\"no_file\"");
        let back: ReadError = serde_json::from_str("\"json_parse\"").unwrap();
        assert_eq!(back, ReadError::JsonParse);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(ReadError::AccessDenied.to_string(), "access to backing file denied");
    }
}
