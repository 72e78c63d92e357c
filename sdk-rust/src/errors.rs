use thiserror::Error;

#[derive(Error, Debug)]
pub enum LanguageModelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The request to the provider failed or the parsing of the response
    /// failed.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request returns a non-OK status code. The message is the one the
    /// provider put in its error envelope, or the raw body when there is none.
    #[error("Status error: {1} (Status {0})")]
    StatusCode(reqwest::StatusCode, String),
    /// The response from the provider was unexpected. (e.g. no choices returned
    /// in an `OpenAI` completion)
    #[error("Invariant from {0}: {1}")]
    Invariant(&'static str, String),
    /// The model refused to process the input. (e.g. `OpenAI` refusal)
    #[error("Refusal: {0}")]
    Refusal(String),
}

impl LanguageModelError {
    /// The message reported by the upstream service, without the
    /// classification prefix added by `Display`.
    #[must_use]
    pub fn upstream_message(&self) -> String {
        match self {
            Self::StatusCode(_, message) | Self::Refusal(message) => message.clone(),
            Self::Invariant(_, message) | Self::InvalidInput(message) => message.clone(),
            Self::Transport(error) => error.to_string(),
        }
    }
}

pub type LanguageModelResult<T> = Result<T, LanguageModelError>;

/// The string does not name a supported `ImageSize`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Unsupported image size '{0}'. Expected one of: {expected}",
    expected = crate::ImageSize::ALL.map(crate::ImageSize::as_str).join(", ")
)]
pub struct ParseImageSizeError(pub String);
