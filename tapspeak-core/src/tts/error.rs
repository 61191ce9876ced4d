use thiserror::Error;

/// Failure taxonomy for synthesis requests. Every variant surfaces to the
/// user as a single message; none are retried automatically.
#[derive(Error, Debug)]
pub enum TtsError {
    /// Missing or malformed credential. Detected before any network call.
    #[error("invalid credential: {0}")]
    Auth(String),

    /// Transport failure. The user may retry.
    #[error("network error: {0}")]
    Network(anyhow::Error),

    /// The backend rejected the request; its message is passed through.
    #[error("synthesis failed: {0}")]
    Synthesis(String),

    /// The returned payload could not be interpreted as audio.
    #[error("could not decode audio: {0}")]
    Decode(String),

    /// Text or segment exceeds a provider's character or sentence budget.
    /// Detected pre-flight.
    #[error("{0}")]
    Validation(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(source: reqwest::Error) -> Self {
        Self::Network(anyhow::anyhow!(source))
    }
}
