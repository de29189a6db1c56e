// Error types for the freshness sensor core
//
// This module defines custom error types for acquisition and training
// operations, providing structured error handling with numeric codes
// suitable for embedding in protocol response lines.

mod acquisition;
mod training;

pub use acquisition::{log_acquisition_error, AcquisitionError, AcquisitionErrorCodes};
pub use training::{log_training_error, TrainingError, TrainingErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling in
/// protocol responses and logs.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
