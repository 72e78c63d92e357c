use crate::{
    config::RelayConfig,
    conversation::Conversation,
    dispatcher::Dispatcher,
    request::{GenerationRequest, GenerationResult, GenerationSettings, Task},
    resolver::{Connector, CredentialResolver},
    CredentialError, GenerationError, TaskKind,
};
use relay_sdk::ImageSize;

/// One user's working state: the connected dispatcher, the chat log and the
/// settings applied to each action.
///
/// Actions take `&mut self`, so a session never has two requests in flight.
pub struct Session {
    dispatcher: Dispatcher,
    conversation: Conversation,
    settings: GenerationSettings,
    image_model: String,
    image_size: ImageSize,
}

impl Session {
    /// Resolve the credential (once per resolver) and reuse the provider that
    /// passed the liveness check.
    pub async fn start(
        resolver: &CredentialResolver,
        connector: &dyn Connector,
        config: &RelayConfig,
    ) -> Result<Self, CredentialError> {
        let dispatcher = resolver.dispatcher(connector).await?;
        Ok(Self::new(dispatcher, config))
    }

    #[must_use]
    pub fn new(dispatcher: Dispatcher, config: &RelayConfig) -> Self {
        Self {
            dispatcher,
            conversation: Conversation::new(),
            settings: config.settings.clone(),
            image_model: config.image_model.clone(),
            image_size: config.image_size,
        }
    }

    /// Append `message` as a user turn and ask for the assistant's reply.
    /// Blank messages are rejected without touching the log.
    pub async fn chat(&mut self, message: &str) -> GenerationResult {
        if message.trim().is_empty() {
            return Err(GenerationError::EmptyInput(TaskKind::Chat));
        }
        self.conversation.push_user(message);
        self.run(Task::Chat).await
    }

    /// Run any task with the session's settings. Image tasks use the
    /// session's image model.
    pub async fn run(&mut self, task: Task) -> GenerationResult {
        let mut settings = self.settings.clone();
        if task.kind() == TaskKind::GenerateImage {
            settings.model.clone_from(&self.image_model);
        }
        self.dispatcher
            .dispatch(GenerationRequest::new(task, settings), &mut self.conversation)
            .await
    }

    /// Generate an image at the session's default size.
    pub async fn generate_image(&mut self, prompt: &str) -> GenerationResult {
        self.run(Task::GenerateImage {
            prompt: prompt.to_string(),
            size: self.image_size,
        })
        .await
    }

    #[must_use]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn clear_conversation(&mut self) {
        self.conversation.clear();
    }

    /// Replace the log, e.g. to start from a system prompt.
    pub fn set_conversation(&mut self, conversation: Conversation) {
        self.conversation = conversation;
    }

    #[must_use]
    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GenerationSettings {
        &mut self.settings
    }
}
