use crate::{credential::KeyFormat, request::GenerationSettings, ConfigError};
use relay_sdk::{openai::OPENAI_DEFAULT_BASE_URL, ImageSize};
use std::{env, path::PathBuf, str::FromStr};

/// Process-level settings. Every field has a default and can be overridden
/// through a `RELAY_*` environment variable.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayConfig {
    /// Name of the key entry in every credential source.
    pub api_key_var: String,
    pub secrets_path: PathBuf,
    pub dotenv_path: PathBuf,
    pub base_url: String,
    pub key_format: KeyFormat,
    pub settings: GenerationSettings,
    pub image_model: String,
    pub image_size: ImageSize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            api_key_var: "OPENAI_API_KEY".to_string(),
            secrets_path: PathBuf::from(".relay/secrets.toml"),
            dotenv_path: PathBuf::from(".env"),
            base_url: OPENAI_DEFAULT_BASE_URL.to_string(),
            key_format: KeyFormat::default(),
            settings: GenerationSettings::default(),
            image_model: "dall-e-2".to_string(),
            image_size: ImageSize::Square256,
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the config from an arbitrary variable lookup. Unset and blank
    /// variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get("RELAY_API_KEY_VAR") {
            config.api_key_var = value;
        }
        if let Some(value) = get("RELAY_SECRETS_PATH") {
            config.secrets_path = PathBuf::from(value);
        }
        if let Some(value) = get("RELAY_DOTENV_PATH") {
            config.dotenv_path = PathBuf::from(value);
        }
        if let Some(value) = get("RELAY_BASE_URL").or_else(|| get("OPENAI_BASE_URL")) {
            config.base_url = value;
        }
        if let Some(value) = get("RELAY_KEY_PREFIX") {
            config.key_format.prefix = value;
        }
        if let Some(value) = get("RELAY_KEY_MIN_LEN") {
            config.key_format.min_len = parse("RELAY_KEY_MIN_LEN", &value)?;
        }
        if let Some(value) = get("RELAY_KEY_MAX_LEN") {
            config.key_format.max_len = parse("RELAY_KEY_MAX_LEN", &value)?;
        }
        if config.key_format.min_len > config.key_format.max_len {
            return Err(ConfigError::InvalidValue {
                var: "RELAY_KEY_MIN_LEN",
                value: config.key_format.min_len.to_string(),
                reason: format!(
                    "must not exceed RELAY_KEY_MAX_LEN ({})",
                    config.key_format.max_len
                ),
            });
        }
        if let Some(value) = get("RELAY_MODEL") {
            config.settings.model = value;
        }
        if let Some(value) = get("RELAY_TEMPERATURE") {
            config.settings.temperature = parse("RELAY_TEMPERATURE", &value)?;
        }
        if let Some(value) = get("RELAY_MAX_OUTPUT_TOKENS") {
            config.settings.max_output_tokens = parse("RELAY_MAX_OUTPUT_TOKENS", &value)?;
        }
        config
            .settings
            .validate()
            .map_err(|error| ConfigError::InvalidValue {
                var: "RELAY_TEMPERATURE/RELAY_MAX_OUTPUT_TOKENS",
                value: format!(
                    "{}/{}",
                    config.settings.temperature, config.settings.max_output_tokens
                ),
                reason: error.to_string(),
            })?;
        if let Some(value) = get("RELAY_IMAGE_MODEL") {
            config.image_model = value;
        }
        if let Some(value) = get("RELAY_IMAGE_SIZE") {
            config.image_size = parse("RELAY_IMAGE_SIZE", &value)?;
        }

        Ok(config)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|error: T::Err| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: error.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<RelayConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        RelayConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(config_from(&[]).unwrap(), RelayConfig::default());
    }

    #[test]
    fn overrides_from_variables() {
        let config = config_from(&[
            ("RELAY_API_KEY_VAR", "GROQ_API_KEY"),
            ("RELAY_KEY_PREFIX", "gsk_"),
            ("RELAY_KEY_MIN_LEN", "30"),
            ("OPENAI_BASE_URL", "http://localhost:11434/v1"),
            ("RELAY_MODEL", "llama3"),
            ("RELAY_TEMPERATURE", "1.5"),
            ("RELAY_IMAGE_SIZE", "1024x1024"),
        ])
        .unwrap();

        assert_eq!(config.api_key_var, "GROQ_API_KEY");
        assert_eq!(config.key_format.prefix, "gsk_");
        assert_eq!(config.key_format.min_len, 30);
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.settings.model, "llama3");
        assert!((config.settings.temperature - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.image_size, ImageSize::Square1024);
    }

    #[test]
    fn relay_base_url_wins_over_openai_base_url() {
        let config = config_from(&[
            ("RELAY_BASE_URL", "http://relay"),
            ("OPENAI_BASE_URL", "http://openai"),
        ])
        .unwrap();
        assert_eq!(config.base_url, "http://relay");
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = config_from(&[("RELAY_MAX_OUTPUT_TOKENS", "lots")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { var: "RELAY_MAX_OUTPUT_TOKENS", .. }
        ));
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        assert!(config_from(&[("RELAY_TEMPERATURE", "3")]).is_err());
    }

    #[test]
    fn rejects_unsupported_image_size() {
        let err = config_from(&[("RELAY_IMAGE_SIZE", "300x300")]).unwrap_err();
        let ConfigError::InvalidValue { var, reason, .. } = err;
        assert_eq!(var, "RELAY_IMAGE_SIZE");
        assert!(reason.contains("Unsupported image size '300x300'"));
    }

    #[test]
    fn rejects_inverted_length_range() {
        assert!(config_from(&[("RELAY_KEY_MIN_LEN", "300")]).is_err());
    }
}
