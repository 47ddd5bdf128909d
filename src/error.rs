//! Error taxonomy shared by the environment, the agent and the I/O adapters.

use thiserror::Error;

/// A specialized `Result` type for simulator and agent operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised synchronously by the operation that detects them.
///
/// No operation leaves partial state behind when it returns one of these.
#[derive(Error, Debug)]
pub enum Error {
    /// A device registration entry has a non-positive power draw, a zero
    /// quantity, or an empty name.
    #[error("invalid device spec: {0}")]
    InvalidDeviceSpec(String),

    /// No device name contains the requested token.
    #[error("no device matches \"{0}\"")]
    NotFound(String),

    /// The action vector length disagrees with the registered device count.
    #[error("action vector has {actual} entries, expected {expected} (one per device)")]
    ActionSizeMismatch { expected: usize, actual: usize },

    /// `2^devices` exceeds the dense table guard.
    #[error("{devices} devices give {actions} joint actions, more than the limit of {max}")]
    ActionSpaceTooLarge {
        devices: usize,
        actions: usize,
        max: usize,
    },

    /// A supplied value table does not have shape `(max_hours, 2^devices)`.
    #[error("value table shape {actual:?} does not match environment shape {expected:?}")]
    TableShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// An encoded action lies outside `[0, num_actions)`.
    #[error("action {action} is out of range for {num_actions} joint actions")]
    InvalidAction { action: usize, num_actions: usize },

    /// A numeric parameter (speed factor, hour, learning rate) is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Reading or writing an exported file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding or decoding a persisted table or CSV export failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_values() {
        let e = Error::ActionSizeMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            e.to_string(),
            "action vector has 2 entries, expected 3 (one per device)"
        );

        let e = Error::ActionSpaceTooLarge {
            devices: 11,
            actions: 2048,
            max: 1024,
        };
        assert!(e.to_string().contains("2048"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
