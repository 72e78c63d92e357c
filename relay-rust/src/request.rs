use crate::{prompts::AnalysisKind, GenerationError};
use relay_sdk::ImageSize;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_TEMPERATURE: f64 = 2.0;

/// The unit of work behind one user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    /// Answer the user turn at the end of the session's conversation.
    Chat,
    Summarize {
        text: String,
    },
    Analyze {
        text: String,
        kind: AnalysisKind,
    },
    /// Free-form text generation from a bare prompt.
    Complete {
        prompt: String,
    },
    Answer {
        question: String,
    },
    GenerateImage {
        prompt: String,
        #[serde(default)]
        size: ImageSize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Chat,
    Summarize,
    Analyze,
    Complete,
    Answer,
    GenerateImage,
}

impl Task {
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Chat => TaskKind::Chat,
            Self::Summarize { .. } => TaskKind::Summarize,
            Self::Analyze { .. } => TaskKind::Analyze,
            Self::Complete { .. } => TaskKind::Complete,
            Self::Answer { .. } => TaskKind::Answer,
            Self::GenerateImage { .. } => TaskKind::GenerateImage,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chat => "chat",
            Self::Summarize => "summarize",
            Self::Analyze => "analyze",
            Self::Complete => "complete",
            Self::Answer => "answer",
            Self::GenerateImage => "generate an image",
        })
    }
}

/// Model and sampling settings applied to a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub model: String,
    /// Ranges from 0.0 to 2.0.
    pub temperature: f64,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_output_tokens: 512,
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.model.trim().is_empty() {
            return Err(GenerationError::InvalidParameter(
                "model must not be empty".to_string(),
            ));
        }
        if !self.temperature.is_finite() || !(0.0..=MAX_TEMPERATURE).contains(&self.temperature) {
            return Err(GenerationError::InvalidParameter(format!(
                "temperature must be between 0 and {MAX_TEMPERATURE}, got {}",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(GenerationError::InvalidParameter(
                "max_output_tokens must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub task: Task,
    pub settings: GenerationSettings,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(task: Task, settings: GenerationSettings) -> Self {
        Self { task, settings }
    }
}

/// What a successful dispatch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutput {
    Text(String),
    /// A reference to the generated image; the bytes stay with the provider.
    Image {
        url: String,
        revised_prompt: Option<String>,
    },
}

impl GenerationOutput {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image { .. } => None,
        }
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Self::Image { url, .. } => Some(url),
            Self::Text(_) => None,
        }
    }
}

pub type GenerationResult = Result<GenerationOutput, GenerationError>;
