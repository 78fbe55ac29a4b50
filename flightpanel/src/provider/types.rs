//! Provider identifiers and error taxonomy.

use std::fmt;

use thiserror::Error;

/// Identifies one of the three upstream data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// Live position provider.
    Position,
    /// Flight schedule provider.
    Schedule,
    /// Destination weather provider.
    Weather,
}

impl ProviderId {
    /// All providers, in query order.
    pub const ALL: [ProviderId; 3] = [
        ProviderId::Position,
        ProviderId::Schedule,
        ProviderId::Weather,
    ];

    /// Stable name for logging and the usage file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Position => "position",
            ProviderId::Schedule => "schedule",
            ProviderId::Weather => "weather",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from a single provider call.
///
/// Everything except [`ProviderError::NotFound`] is transient: the field
/// stays absent for this tick and the next poll retries naturally.
/// `NotFound` is a definitive response from the provider, not a failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed (connection error, timeout, non-success status).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body could not be parsed.
    #[error("failed to parse response: {0}")]
    Malformed(String),

    /// Authentication with the provider failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The provider explicitly does not know the flight.
    #[error("flight {0} not found")]
    NotFound(String),
}

impl ProviderError {
    /// Definitive not-found, as opposed to a transient failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProviderError::NotFound(_))
    }
}
