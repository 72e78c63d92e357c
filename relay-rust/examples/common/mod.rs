use prompt_relay::{CredentialResolver, OpenAIConnector, RelayConfig, Session};
use tracing_subscriber::EnvFilter;

/// Install a `RUST_LOG`-driven subscriber, resolve the API key and open a
/// session. Exits with the resolver's guidance when no usable key is found.
pub async fn start_session() -> Session {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = RelayConfig::from_env().expect("invalid RELAY_* configuration");
    let resolver = CredentialResolver::from_config(&config);
    let connector = OpenAIConnector::new(Some(config.base_url.clone()));

    match Session::start(&resolver, &connector, &config).await {
        Ok(session) => session,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}
