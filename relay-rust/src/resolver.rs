use crate::{
    config::RelayConfig,
    credential::{Credential, KeyFormat},
    dispatcher::Dispatcher,
    sources::{CredentialSource, DotEnvSource, EnvSource, SecretStoreSource},
    CredentialError,
};
use relay_sdk::{
    openai::{OpenAIProvider, OpenAIProviderOptions},
    ModelProvider,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

const DEFAULT_KEY_NAME: &str = "OPENAI_API_KEY";
const CONNECTION_GUIDANCE: &str = "Check the key on your provider's API keys page, make sure \
                                   the account has access, then restart. If the key is fine, \
                                   check the provider's status page for outages.";

/// Builds a provider bound to a credential.
pub trait Connector: Send + Sync {
    fn connect(&self, credential: &Credential) -> Arc<dyn ModelProvider>;
}

impl<F> Connector for F
where
    F: Fn(&Credential) -> Arc<dyn ModelProvider> + Send + Sync,
{
    fn connect(&self, credential: &Credential) -> Arc<dyn ModelProvider> {
        self(credential)
    }
}

/// Connects to an `OpenAI`-compatible API.
#[derive(Debug, Clone, Default)]
pub struct OpenAIConnector {
    base_url: Option<String>,
}

impl OpenAIConnector {
    #[must_use]
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url }
    }
}

impl Connector for OpenAIConnector {
    fn connect(&self, credential: &Credential) -> Arc<dyn ModelProvider> {
        Arc::new(OpenAIProvider::new(OpenAIProviderOptions {
            base_url: self.base_url.clone(),
            api_key: credential.secret().to_string(),
            ..Default::default()
        }))
    }
}

/// Finds the API key, validates it, and confirms the provider accepts it.
///
/// Sources are probed in order and the first non-blank value wins. The
/// outcome, success or failure, is computed once and replayed on every later
/// call.
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
    format: KeyFormat,
    key_name: String,
    outcome: OnceCell<Result<Resolved, CredentialError>>,
}

/// A credential together with the provider that passed the liveness check.
#[derive(Clone)]
struct Resolved {
    credential: Credential,
    provider: Arc<dyn ModelProvider>,
}

impl CredentialResolver {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn CredentialSource>>, format: KeyFormat) -> Self {
        Self {
            sources,
            format,
            key_name: DEFAULT_KEY_NAME.to_string(),
            outcome: OnceCell::new(),
        }
    }

    /// Name of the key entry, used in the guidance for a missing key.
    #[must_use]
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = key_name.into();
        self
    }

    /// Secret store, then process environment, then the `.env` file.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(
            vec![
                Box::new(SecretStoreSource::new(
                    &config.secrets_path,
                    &config.api_key_var,
                )),
                Box::new(EnvSource::new(&config.api_key_var)),
                Box::new(DotEnvSource::new(&config.dotenv_path, &config.api_key_var)),
            ],
            config.key_format.clone(),
        )
        .with_key_name(&config.api_key_var)
    }

    pub async fn resolve(&self, connector: &dyn Connector) -> Result<Credential, CredentialError> {
        self.resolved(connector)
            .await
            .map(|resolved| resolved.credential)
    }

    /// Resolve, then hand out a dispatcher bound to the provider that passed
    /// the liveness check.
    pub async fn dispatcher(
        &self,
        connector: &dyn Connector,
    ) -> Result<Dispatcher, CredentialError> {
        let resolved = self.resolved(connector).await?;
        Ok(Dispatcher::from_provider(resolved.provider))
    }

    /// The memoized outcome, if resolution already ran.
    #[must_use]
    pub fn cached(&self) -> Option<Result<Credential, CredentialError>> {
        self.outcome
            .get()
            .map(|outcome| outcome.clone().map(|resolved| resolved.credential))
    }

    async fn resolved(&self, connector: &dyn Connector) -> Result<Resolved, CredentialError> {
        self.outcome
            .get_or_init(|| async {
                let credential = self.probe()?;
                let provider = self.check_liveness(&credential, connector).await?;
                Ok::<_, CredentialError>(Resolved {
                    credential,
                    provider,
                })
            })
            .await
            .clone()
    }

    fn probe(&self) -> Result<Credential, CredentialError> {
        for source in &self.sources {
            let origin = source.origin();
            if let Some(raw) = source.read()?.filter(|raw| !raw.trim().is_empty()) {
                tracing::debug!(%origin, "api key found");
                return Credential::parse(&raw, origin, &self.format).inspect_err(|error| {
                    tracing::warn!(%error, "api key rejected by format check");
                });
            }
            tracing::trace!(%origin, "no api key in source");
        }

        let checked = self
            .sources
            .iter()
            .map(|source| format!("  - {}", source.origin()))
            .collect::<Vec<_>>()
            .join("\n");
        tracing::warn!("no api key found in any source");
        Err(CredentialError::Missing {
            guidance: format!(
                "Checked, in order:\n{checked}\nAdd the key to one of them (for example \
                 {}={}... in .env, with no quotes or spaces) and restart.",
                self.key_name, self.format.prefix
            ),
        })
    }

    async fn check_liveness(
        &self,
        credential: &Credential,
        connector: &dyn Connector,
    ) -> Result<Arc<dyn ModelProvider>, CredentialError> {
        let provider = connector.connect(credential);
        match provider.list_models().await {
            Ok(models) => {
                tracing::info!(
                    provider = provider.provider(),
                    models = models.len(),
                    "api key accepted"
                );
                Ok(provider)
            }
            Err(error) => {
                tracing::warn!(provider = provider.provider(), %error, "liveness check failed");
                Err(CredentialError::ConnectionFailed {
                    detail: error.upstream_message(),
                    guidance: CONNECTION_GUIDANCE.to_string(),
                })
            }
        }
    }
}
