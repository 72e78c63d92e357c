use relay_sdk::{Message, Role};

/// One message of a conversation, tagged with its speaker.
pub type ConversationTurn = Message;

/// The ordered, append-only log of a chat session.
///
/// Turns can only be appended; the whole log can be cleared, single turns
/// cannot be removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with a system turn that steers the assistant.
    #[must_use]
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Message::system(prompt)],
        }
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    #[must_use]
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    #[must_use]
    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// The user turn awaiting an answer, if the log ends with one.
    #[must_use]
    pub fn pending_user_turn(&self) -> Option<&ConversationTurn> {
        self.last().filter(|turn| turn.role == Role::User)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Remove every turn, including a leading system turn.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub(crate) fn to_messages(&self) -> Vec<Message> {
        self.turns.clone()
    }
}
