mod config;
mod conversation;
mod credential;
mod dispatcher;
mod errors;
mod prompts;
mod request;
mod resolver;
mod session;
mod sources;

pub use config::RelayConfig;
pub use conversation::{Conversation, ConversationTurn};
pub use credential::{Credential, CredentialOrigin, KeyFormat};
pub use dispatcher::Dispatcher;
pub use errors::*;
pub use prompts::AnalysisKind;
pub use relay_sdk::{ImageSize, Role};
pub use request::{
    GenerationOutput, GenerationRequest, GenerationResult, GenerationSettings, Task, TaskKind,
    MAX_TEMPERATURE,
};
pub use resolver::{Connector, CredentialResolver, OpenAIConnector};
pub use session::Session;
pub use sources::{CredentialSource, DotEnvSource, EnvSource, SecretStoreSource};
