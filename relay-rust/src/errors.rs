use crate::{credential::CredentialOrigin, request::TaskKind};
use relay_sdk::LanguageModelError;
use thiserror::Error;

/// Why the API key could not be resolved. Always fatal to the session: the
/// caller shows the guidance and stops until the key is fixed and the
/// process restarted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("API key missing. {guidance}")]
    Missing { guidance: String },
    #[error("API key from {origin} is malformed. {guidance}")]
    InvalidFormat {
        origin: CredentialOrigin,
        guidance: String,
    },
    #[error("Connection failed: {detail}. {guidance}")]
    ConnectionFailed { detail: String, guidance: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialErrorKind {
    Missing,
    InvalidFormat,
    ConnectionFailed,
}

impl CredentialError {
    #[must_use]
    pub fn kind(&self) -> CredentialErrorKind {
        match self {
            Self::Missing { .. } => CredentialErrorKind::Missing,
            Self::InvalidFormat { .. } => CredentialErrorKind::InvalidFormat,
            Self::ConnectionFailed { .. } => CredentialErrorKind::ConnectionFailed,
        }
    }

    /// Human-readable remediation steps.
    #[must_use]
    pub fn guidance(&self) -> &str {
        match self {
            Self::Missing { guidance }
            | Self::InvalidFormat { guidance, .. }
            | Self::ConnectionFailed { guidance, .. } => guidance,
        }
    }
}

/// A failed dispatch. Local to one user action; the session stays usable.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// Blank input is rejected before anything is sent upstream.
    #[error("Please enter some text to {0}.")]
    EmptyInput(TaskKind),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// The upstream call failed. Carries the upstream message unmodified.
    #[error("{0}")]
    UpstreamFailure(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    EmptyInput,
    InvalidParameter,
    UpstreamFailure,
}

impl GenerationError {
    #[must_use]
    pub fn kind(&self) -> GenerationErrorKind {
        match self {
            Self::EmptyInput(_) => GenerationErrorKind::EmptyInput,
            Self::InvalidParameter(_) => GenerationErrorKind::InvalidParameter,
            Self::UpstreamFailure(_) => GenerationErrorKind::UpstreamFailure,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<LanguageModelError> for GenerationError {
    fn from(error: LanguageModelError) -> Self {
        Self::UpstreamFailure(error.upstream_message())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {var}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}
