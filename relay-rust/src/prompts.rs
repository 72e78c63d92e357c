use serde::{Deserialize, Serialize};
use std::fmt;

/// What an `analyze` request should do with the user's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AnalysisKind {
    Sentiment,
    KeyPoints,
    Translation { target_language: String },
    Proofread,
    Summary,
}

impl AnalysisKind {
    /// The system message sent ahead of the user's text.
    #[must_use]
    pub fn instruction(&self) -> String {
        match self {
            Self::Sentiment => "Analyze the sentiment of the text provided by the user. Say \
                                whether it is positive, negative, neutral or mixed, then \
                                explain briefly."
                .to_string(),
            Self::KeyPoints => "Extract the key points of the text provided by the user as a \
                                short bulleted list."
                .to_string(),
            Self::Translation { target_language } => format!(
                "Translate the text provided by the user into {target_language}. Reply with \
                 the translation only."
            ),
            Self::Proofread => "Proofread the text provided by the user. Fix spelling, grammar \
                                and punctuation, and reply with the corrected text only."
                .to_string(),
            Self::Summary => summary_instruction().to_string(),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentiment => f.write_str("sentiment"),
            Self::KeyPoints => f.write_str("key points"),
            Self::Translation { target_language } => write!(f, "translation to {target_language}"),
            Self::Proofread => f.write_str("proofread"),
            Self::Summary => f.write_str("summary"),
        }
    }
}

pub(crate) fn summary_instruction() -> &'static str {
    "Summarize the text provided by the user concisely, keeping its main facts."
}

pub(crate) fn answer_instruction() -> &'static str {
    "Answer the question asked by the user accurately and concisely."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_names_the_target_language() {
        let kind = AnalysisKind::Translation {
            target_language: "French".to_string(),
        };
        assert!(kind.instruction().contains("into French"));
        assert_eq!(kind.to_string(), "translation to French");
    }

    #[test]
    fn every_kind_has_a_distinct_instruction() {
        let kinds = [
            AnalysisKind::Sentiment,
            AnalysisKind::KeyPoints,
            AnalysisKind::Translation {
                target_language: "German".to_string(),
            },
            AnalysisKind::Proofread,
            AnalysisKind::Summary,
        ];
        let mut instructions: Vec<String> = kinds.iter().map(AnalysisKind::instruction).collect();
        instructions.sort();
        instructions.dedup();
        assert_eq!(instructions.len(), kinds.len());
    }
}
