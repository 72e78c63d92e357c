use crate::{ImageGenerationInput, ImageSize, Message, ParseImageSizeError, Role};
use std::{fmt, str::FromStr};

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

impl ImageSize {
    pub const ALL: [Self; 5] = [
        Self::Square256,
        Self::Square512,
        Self::Square1024,
        Self::Landscape1792,
        Self::Portrait1792,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square256 => "256x256",
            Self::Square512 => "512x512",
            Self::Square1024 => "1024x1024",
            Self::Landscape1792 => "1792x1024",
            Self::Portrait1792 => "1024x1792",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = ParseImageSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == normalized)
            .ok_or_else(|| ParseImageSizeError(s.to_string()))
    }
}

impl ImageGenerationInput {
    /// A request for a single image of the given size.
    pub fn new(prompt: impl Into<String>, size: ImageSize) -> Self {
        Self {
            model: None,
            prompt: prompt.into(),
            size,
            n: 1,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_image_size_case_insensitively() {
        assert_eq!(
            "1024X1792".parse::<ImageSize>().unwrap(),
            ImageSize::Portrait1792
        );
        assert_eq!(" 256x256 ".parse::<ImageSize>().unwrap(), ImageSize::Square256);
    }

    #[test]
    fn rejects_unknown_image_size() {
        let err = "300x300".parse::<ImageSize>().unwrap_err();
        assert_eq!(err, ParseImageSizeError("300x300".to_string()));
        assert!(err.to_string().contains("300x300"));
        assert!(err.to_string().contains("1792x1024"));
    }

    #[test]
    fn image_size_serializes_as_dimensions() {
        let value = serde_json::to_value(ImageSize::Landscape1792).unwrap();
        assert_eq!(value, serde_json::json!("1792x1024"));
    }
}
