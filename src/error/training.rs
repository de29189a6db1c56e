// Training error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Training error code constants
///
/// Error code range: 2001-2002
pub struct TrainingErrorCodes {}

impl TrainingErrorCodes {
    /// END received with no session in progress
    pub const NO_SESSION_ACTIVE: i32 = 2001;

    /// Merging the session would leave a class with zero contributing rows
    pub const MISSING_CLASS: i32 = 2002;
}

/// Log a training error with structured context
pub fn log_training_error(err: &TrainingError, context: &str) {
    error!(
        "Training error in {}: code={}, component=TrainingSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Training-related errors
///
/// These errors cover the BEGIN/feed/END session protocol. A refused merge
/// leaves the persisted model untouched; the session is simply discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingError {
    /// END received outside of an active session
    NoSessionActive,

    /// After the prospective merge a class would have no contributing rows
    MissingClass { fresh_rows: u32, spoil_rows: u32 },
}

impl ErrorCode for TrainingError {
    fn code(&self) -> i32 {
        match self {
            TrainingError::NoSessionActive => TrainingErrorCodes::NO_SESSION_ACTIVE,
            TrainingError::MissingClass { .. } => TrainingErrorCodes::MISSING_CLASS,
        }
    }

    fn message(&self) -> String {
        match self {
            TrainingError::NoSessionActive => "No training session active".to_string(),
            TrainingError::MissingClass {
                fresh_rows,
                spoil_rows,
            } => {
                format!(
                    "Need both classes: fresh={}, spoil={}",
                    fresh_rows, spoil_rows
                )
            }
        }
    }
}

impl fmt::Display for TrainingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrainingError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for TrainingError {}
