// Acquisition error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Acquisition error code constants
///
/// These constants provide a single source of truth for the numeric codes
/// embedded in protocol error responses.
///
/// Error code range: 1001-1002
pub struct AcquisitionErrorCodes {}

impl AcquisitionErrorCodes {
    /// Too few valid echoes in the acquisition window
    pub const INSUFFICIENT_SAMPLES: i32 = 1001;

    /// No echo returned at all during the acquisition window
    pub const NO_ECHO: i32 = 1002;
}

/// Log an acquisition error with structured context
///
/// Logs the numeric error code, the component, and the human-readable
/// message. Logging is non-blocking and never panics.
pub fn log_acquisition_error(err: &AcquisitionError, context: &str) {
    error!(
        "Acquisition error in {}: code={}, component=WindowFilter, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Acquisition-related errors
///
/// These errors cover the echo acquisition window: drawing raw samples from
/// the probe and deriving robust statistics from them. They are never fatal;
/// callers report them as retry messages and continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// Too few valid echoes collected for the requested operation
    InsufficientSamples { required: usize, collected: usize },

    /// The whole window timed out without a single return signal
    NoEcho,
}

impl ErrorCode for AcquisitionError {
    fn code(&self) -> i32 {
        match self {
            AcquisitionError::InsufficientSamples { .. } => {
                AcquisitionErrorCodes::INSUFFICIENT_SAMPLES
            }
            AcquisitionError::NoEcho => AcquisitionErrorCodes::NO_ECHO,
        }
    }

    fn message(&self) -> String {
        match self {
            AcquisitionError::InsufficientSamples {
                required,
                collected,
            } => {
                format!("Insufficient samples: need {}, got {}", required, collected)
            }
            AcquisitionError::NoEcho => "No echo received".to_string(),
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AcquisitionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for AcquisitionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquisition_error_codes() {
        assert_eq!(
            AcquisitionError::InsufficientSamples {
                required: 7,
                collected: 3
            }
            .code(),
            AcquisitionErrorCodes::INSUFFICIENT_SAMPLES
        );
        assert_eq!(AcquisitionError::NoEcho.code(), AcquisitionErrorCodes::NO_ECHO);
    }

    #[test]
    fn test_acquisition_error_messages() {
        let err = AcquisitionError::InsufficientSamples {
            required: 7,
            collected: 3,
        };
        assert_eq!(err.message(), "Insufficient samples: need 7, got 3");

        let err = AcquisitionError::NoEcho;
        assert!(err.message().contains("No echo"));
    }

    #[test]
    fn test_acquisition_error_display() {
        let err = AcquisitionError::NoEcho;
        let display = format!("{}", err);
        assert!(display.contains("AcquisitionError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
