use thiserror::Error;

/// Failures that reach the host as a single visible message.
///
/// Skipped records and ignored navigation are not represented here: they are
/// absorbed where they happen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataFault {
    #[error("Current account must have billing latitude and longitude")]
    MissingCoordinates,
    #[error("Error loading nearby accounts: {0}")]
    Upstream(String),
    #[error("Error loading nearby accounts: expected a list of accounts, got {0}")]
    NotASequence(String),
}

impl DataFault {
    /// Wrap an upstream failure, substituting a generic message when the
    /// remote side gave none.
    pub fn upstream(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            DataFault::Upstream("An unexpected error occurred".to_string())
        } else {
            DataFault::Upstream(message)
        }
    }
}
