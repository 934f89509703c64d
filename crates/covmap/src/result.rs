//! Result and error types for covmap.

use crate::coverage::EventKind;
use thiserror::Error;

/// Result type for covmap operations
pub type CovmapResult<T> = Result<T, CovmapError>;

/// Errors that abort a coverage run
///
/// Every variant is fatal. Conditions that only drop or flag a single event
/// are recorded as [`crate::coverage::Diagnostic`] values instead.
#[derive(Debug, Error)]
pub enum CovmapError {
    /// Contract name was empty, so no topics can be derived
    #[error("Cannot register topics for an empty contract name")]
    EmptyContractName,

    /// The same canonical path was registered twice
    #[error("Contract path {path} is already registered")]
    DuplicateContract {
        /// Canonical contract path
        path: String,
    },

    /// fnMap/branchMap/statementMap keys are not contiguous from 1
    #[error("Dense index violation in {map} of {contract}: expected key {expected}, found {found}")]
    DenseIndexViolation {
        /// Contract name
        contract: String,
        /// Which metadata map is broken
        map: &'static str,
        /// First key that should have been present
        expected: u32,
        /// Key found in its place
        found: u32,
    },

    /// Event payload does not match the layout of its classified kind
    #[error("Failed to decode {kind} event payload: {message}")]
    DecodeFailure {
        /// Kind the record was classified as
        kind: EventKind,
        /// What was wrong with the payload
        message: String,
    },

    /// Event references a path that was never passed to `add_contract`
    #[error("Event references unregistered contract path {path}")]
    UnregisteredContract {
        /// Path carried by the event
        path: String,
    },

    /// Event references an index with no initialized counter
    #[error("No {kind} counter at index {index} for contract {path}")]
    UnknownCounter {
        /// Kind of the offending event
        kind: EventKind,
        /// Canonical contract path
        path: String,
        /// Index carried by the event
        index: u32,
    },

    /// Session contract limit reached
    #[error("Contract limit of {max} reached, cannot register {path}")]
    CapacityExceeded {
        /// Configured limit
        max: usize,
        /// Path that did not fit
        path: String,
    },

    /// Hex string in an event record or topic could not be parsed
    #[error("Invalid hex string {input:?}: {message}")]
    InvalidHex {
        /// Offending input
        input: String,
        /// Parse error
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CovmapError {
    /// Create a decode failure for the given kind
    #[must_use]
    pub fn decode(kind: EventKind, message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            kind,
            message: message.into(),
        }
    }

    /// Create an invalid hex error
    #[must_use]
    pub fn invalid_hex(input: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidHex {
            input: input.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_index_message_names_contract_and_key() {
        let err = CovmapError::DenseIndexViolation {
            contract: "Wallet".to_string(),
            map: "fnMap",
            expected: 3,
            found: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("fnMap"));
        assert!(msg.contains("Wallet"));
        assert!(msg.contains("expected key 3"));
    }

    #[test]
    fn test_decode_failure_names_kind() {
        let err = CovmapError::decode(EventKind::Branch, "payload too short");
        assert!(err.to_string().contains("branch"));
        assert!(err.to_string().contains("payload too short"));
    }

    #[test]
    fn test_unregistered_contract_message() {
        let err = CovmapError::UnregisteredContract {
            path: "contracts/Missing.sol".to_string(),
        };
        assert!(err.to_string().contains("contracts/Missing.sol"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CovmapError = io.into();
        assert!(matches!(err, CovmapError::Io(_)));
    }
}
