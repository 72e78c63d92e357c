use crate::CredentialError;
use std::{fmt, ops::RangeInclusive, path::PathBuf};

/// Where a credential was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOrigin {
    /// A TOML secret store file.
    SecretStore(PathBuf),
    /// A process environment variable.
    Environment(String),
    /// A `KEY=VALUE` file such as `.env`.
    DotEnv(PathBuf),
    Custom(String),
}

impl fmt::Display for CredentialOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecretStore(path) => write!(f, "secret store {}", path.display()),
            Self::Environment(var) => write!(f, "environment variable {var}"),
            Self::DotEnv(path) => write!(f, "env file {}", path.display()),
            Self::Custom(name) => f.write_str(name),
        }
    }
}

/// The shape a provider's API keys are expected to have. Providers change
/// key formats over time, so this is configuration rather than a constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFormat {
    pub prefix: String,
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self {
            prefix: "sk-".to_string(),
            min_len: 20,
            max_len: 256,
        }
    }
}

impl KeyFormat {
    #[must_use]
    pub fn length_range(&self) -> RangeInclusive<usize> {
        self.min_len..=self.max_len
    }

    /// Check an already trimmed key. Returns the reason on failure.
    pub fn check(&self, key: &str) -> Result<(), String> {
        if key.is_empty() {
            return Err("the value is empty".to_string());
        }
        if !key.starts_with(&self.prefix) {
            return Err(format!("it does not start with '{}'", self.prefix));
        }
        let len = key.chars().count();
        if !self.length_range().contains(&len) {
            return Err(format!(
                "it is {len} characters long, expected {} to {}",
                self.min_len, self.max_len
            ));
        }
        if key.chars().any(char::is_whitespace) {
            return Err("it contains whitespace".to_string());
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "Keys start with '{}' and are {} to {} characters long.",
            self.prefix, self.min_len, self.max_len
        )
    }
}

/// A validated API key. The only way to obtain one is through
/// [`Credential::parse`], so holding a `Credential` means the format check
/// passed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    secret: String,
    origin: CredentialOrigin,
}

impl Credential {
    /// Trim and validate a raw key read from `origin`.
    pub fn parse(
        raw: &str,
        origin: CredentialOrigin,
        format: &KeyFormat,
    ) -> Result<Self, CredentialError> {
        let secret = raw.trim();
        match format.check(secret) {
            Ok(()) => Ok(Self {
                secret: secret.to_string(),
                origin,
            }),
            Err(reason) => {
                let guidance = format!(
                    "The key was rejected because {reason}. {} Copy the key again from your \
                     provider's API keys page, without quotes or spaces.",
                    format.describe()
                );
                Err(CredentialError::InvalidFormat { origin, guidance })
            }
        }
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    #[must_use]
    pub fn origin(&self) -> &CredentialOrigin {
        &self.origin
    }

    /// The key with everything but a short head and tail hidden.
    #[must_use]
    pub fn redacted(&self) -> String {
        let chars: Vec<char> = self.secret.chars().collect();
        let head: String = chars.iter().take(3).collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &self.redacted())
            .field("origin", &self.origin)
            .finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (from {})", self.redacted(), self.origin)
    }
}
