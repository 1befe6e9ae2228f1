//! Crate error types
//!
//! Only the fatal startup path surfaces errors: without a catalog there is
//! nothing to show. Every other failure — a missing playing snapshot, a
//! malformed stream message, a dropped connection, a lost command — is
//! absorbed where it happens and degrades to a valid, renderable state.

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for fatal client operations
#[derive(Debug)]
pub enum Error {
    /// HTTP transport failure
    Transport(reqwest::Error),
    /// Malformed response body
    Decode(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "Transport failure: {}", e),
            Error::Decode(e) => write!(f, "Malformed response: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(e) => Some(e),
            Error::Decode(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e)
    }
}
