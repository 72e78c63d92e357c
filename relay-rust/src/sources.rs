use crate::{credential::CredentialOrigin, CredentialError};
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

/// One place an API key may live.
///
/// `read` returns `Ok(None)` when the source simply has no key (missing file,
/// unset variable, blank value) and an error only when the source exists but
/// cannot be read.
pub trait CredentialSource: Send + Sync {
    fn origin(&self) -> CredentialOrigin;
    fn read(&self) -> Result<Option<String>, CredentialError>;
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn unreadable(origin: &CredentialOrigin, reason: impl std::fmt::Display) -> CredentialError {
    CredentialError::Missing {
        guidance: format!("Could not read {origin}: {reason}. Fix or remove it, then restart."),
    }
}

/// A TOML secret store holding the key as a top-level string entry, e.g.
/// `OPENAI_API_KEY = "sk-..."`.
pub struct SecretStoreSource {
    path: PathBuf,
    key: String,
}

impl SecretStoreSource {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }
}

impl CredentialSource for SecretStoreSource {
    fn origin(&self) -> CredentialOrigin {
        CredentialOrigin::SecretStore(self.path.clone())
    }

    fn read(&self) -> Result<Option<String>, CredentialError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(unreadable(&self.origin(), error)),
        };

        let table: toml::Table =
            toml::from_str(&contents).map_err(|error| unreadable(&self.origin(), error))?;

        match table.get(&self.key) {
            None => Ok(None),
            Some(toml::Value::String(value)) => Ok(non_blank(value.clone())),
            Some(other) => Err(unreadable(
                &self.origin(),
                format!("'{}' must be a string, found {}", self.key, other.type_str()),
            )),
        }
    }
}

/// A process environment variable.
pub struct EnvSource {
    var: String,
}

impl EnvSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvSource {
    fn origin(&self) -> CredentialOrigin {
        CredentialOrigin::Environment(self.var.clone())
    }

    fn read(&self) -> Result<Option<String>, CredentialError> {
        match env::var(&self.var) {
            Ok(value) => Ok(non_blank(value)),
            Err(env::VarError::NotPresent) => Ok(None),
            Err(error @ env::VarError::NotUnicode(_)) => Err(unreadable(&self.origin(), error)),
        }
    }
}

/// A local `KEY=VALUE` file. The file is parsed in place; the process
/// environment is left untouched.
pub struct DotEnvSource {
    path: PathBuf,
    key: String,
}

impl DotEnvSource {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialSource for DotEnvSource {
    fn origin(&self) -> CredentialOrigin {
        CredentialOrigin::DotEnv(self.path.clone())
    }

    fn read(&self) -> Result<Option<String>, CredentialError> {
        let entries = match dotenvy::from_path_iter(&self.path) {
            Ok(entries) => entries,
            Err(dotenvy::Error::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(None)
            }
            Err(error) => return Err(unreadable(&self.origin(), error)),
        };

        // Later definitions of the same key win, as when the file is sourced.
        let mut found = None;
        for entry in entries {
            let (key, value) = entry.map_err(|error| unreadable(&self.origin(), error))?;
            if key == self.key {
                found = Some(value);
            }
        }

        Ok(found.and_then(non_blank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CredentialErrorKind;

    #[test]
    fn secret_store_reads_top_level_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "OPENAI_API_KEY = \"sk-from-store\"\nOTHER = 1\n").unwrap();

        let source = SecretStoreSource::new(&path, "OPENAI_API_KEY");
        assert_eq!(source.read().unwrap().as_deref(), Some("sk-from-store"));
    }

    #[test]
    fn secret_store_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let source = SecretStoreSource::new(dir.path().join("nope.toml"), "OPENAI_API_KEY");
        assert_eq!(source.read().unwrap(), None);
    }

    #[test]
    fn secret_store_rejects_non_string_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "OPENAI_API_KEY = 42\n").unwrap();

        let err = SecretStoreSource::new(&path, "OPENAI_API_KEY")
            .read()
            .unwrap_err();
        assert_eq!(err.kind(), CredentialErrorKind::Missing);
        assert!(err.guidance().contains("must be a string"));
    }

    #[test]
    fn secret_store_reports_broken_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "OPENAI_API_KEY = \"unterminated\n").unwrap();

        let err = SecretStoreSource::new(&path, "OPENAI_API_KEY")
            .read()
            .unwrap_err();
        assert!(err.guidance().contains("secrets.toml"));
    }

    #[test]
    fn dotenv_reads_key_without_touching_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(
            &path,
            "# comment\nRELAY_DOTENV_ONLY_KEY=sk-from-dotenv\nOTHER=value\n",
        )
        .unwrap();

        let source = DotEnvSource::new(&path, "RELAY_DOTENV_ONLY_KEY");
        assert_eq!(source.read().unwrap().as_deref(), Some("sk-from-dotenv"));
        assert!(env::var("RELAY_DOTENV_ONLY_KEY").is_err());
    }

    #[test]
    fn dotenv_blank_value_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "OPENAI_API_KEY=   \n").unwrap();

        let source = DotEnvSource::new(&path, "OPENAI_API_KEY");
        assert_eq!(source.read().unwrap(), None);
    }

    #[test]
    fn env_source_unset_variable_is_absent() {
        let source = EnvSource::new("RELAY_TEST_VARIABLE_THAT_IS_NEVER_SET");
        assert_eq!(source.read().unwrap(), None);
    }
}
