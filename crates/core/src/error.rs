//! Error types for call handling

use thiserror::Error;

/// Errors raised while handling a call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Turn request carried no call identifier")]
    MissingCallIdentifier,

    #[error("No pending call data for call {0}")]
    NoPendingCallData(String),

    #[error("No active session for call {0}")]
    NoActiveSession(String),

    #[error("Classification failed: {0}")]
    Classification(String),

    #[error("Could not resolve date token: {0}")]
    UnresolvableDate(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Session already ended: {0}")]
    SessionEnded(String),
}

pub type Result<T> = std::result::Result<T, CallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CallError::NoPendingCallData("call-42".into());
        assert_eq!(err.to_string(), "No pending call data for call call-42");
    }
}
