//! Error taxonomy for polling sessions

use thiserror::Error;

/// Rejected session parameters. A session never starts with these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter at least one coin.")]
    EmptySymbolList,

    #[error("Invalid interval '{0}'. Please enter a positive whole number of seconds.")]
    InvalidInterval(String),
}

/// Failures surfaced by the polling controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("A polling session is already running. Stop it first.")]
    AlreadyRunning,

    #[error("Failed to fetch {from}/{to} conversion rate: {reason}")]
    RateUnavailable {
        from: String,
        to: String,
        reason: String,
    },

    #[error("Error fetching available coins: {0}")]
    SymbolListing(String),
}

impl SessionError {
    /// Fatal errors end the session (rate) or the request (listing).
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SessionError::RateUnavailable { .. } | SessionError::SymbolListing(_)
        )
    }
}

/// A session failure the sink has already shown to the user.
///
/// Front ends return this so the process can exit non-zero without printing
/// the same message a second time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(transparent)]
pub struct Reported(#[from] pub SessionError);

/// Parses a polling interval in whole seconds. Zero is not a valid interval.
pub fn parse_interval(input: &str) -> Result<u64, ValidationError> {
    match input.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ValidationError::InvalidInterval(input.trim().to_string())),
    }
}
