use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::sentiment::Prediction;

/// Classifier scores below this collapse to [`Sentiment::Neutral`].
pub const CONFIDENCE_THRESHOLD: f32 = 0.75;

/// The classifier only sees this many leading characters of a prompt.
pub const CLASSIFIER_CHAR_LIMIT: usize = 512;

const DEFAULT_TONE: &str = "neutral and descriptive";

/// Coarse sentiment of a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    /// The models were not available.
    Error,
}

impl Sentiment {
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
            Sentiment::Error => "ERROR",
        }
    }

    /// Map a classifier label onto the three content sentiments.
    ///
    /// Case-insensitive. Labels outside POSITIVE/NEGATIVE/NEUTRAL become NEUTRAL.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Sentiment::Positive,
            "NEGATIVE" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    /// Descriptive tone phrase used to condition generation.
    pub fn tone(self) -> &'static str {
        tone_for(self.as_str())
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone phrase for a sentiment label, case-insensitive.
pub fn tone_for(label: &str) -> &'static str {
    match label.to_ascii_uppercase().as_str() {
        "POSITIVE" => "joyful and uplifting",
        "NEGATIVE" => "melancholic and reflective",
        "NEUTRAL" => DEFAULT_TONE,
        _ => DEFAULT_TONE,
    }
}

/// Instruction for the generator.
pub fn craft_prompt(user_prompt: &str, sentiment_label: &str) -> String {
    let tone = tone_for(sentiment_label);
    format!(
        "Write a single, coherent paragraph in a {tone} tone about the following topic:\n{user_prompt}"
    )
}

/// The leading part of `prompt` the classifier gets to see.
pub fn classifier_input(prompt: &str) -> &str {
    match prompt.char_indices().nth(CLASSIFIER_CHAR_LIMIT) {
        Some((end, _)) => &prompt[..end],
        None => prompt,
    }
}

/// Apply the confidence threshold to a raw prediction.
pub fn resolve_sentiment(prediction: &Prediction) -> Sentiment {
    if prediction.score < CONFIDENCE_THRESHOLD {
        Sentiment::Neutral
    } else {
        Sentiment::from_label(&prediction.label)
    }
}

// A `---` at the start of the text or after whitespace, and everything after it.
static JUNK_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)(?:^|\s+)---.*").expect("junk suffix pattern is valid"));

/// Strip the `---` junk suffix generators sometimes emit, then trim.
pub fn clean_generation(raw: &str) -> String {
    JUNK_SUFFIX.replace(raw, "").trim().to_string()
}

/// Output size picked in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl OutputLength {
    pub const ALL: [OutputLength; 3] = [OutputLength::Short, OutputLength::Medium, OutputLength::Long];

    /// Maximum new tokens handed to the generator.
    pub fn max_tokens(self) -> usize {
        match self {
            OutputLength::Short => 80,
            OutputLength::Medium => 200,
            OutputLength::Long => 380,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputLength::Short => "Short (~50 words)",
            OutputLength::Medium => "Medium (~120 words)",
            OutputLength::Long => "Long (~220 words)",
        }
    }

    pub fn value(self) -> &'static str {
        match self {
            OutputLength::Short => "short",
            OutputLength::Medium => "medium",
            OutputLength::Long => "long",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(label: &str, score: f32) -> Prediction {
        Prediction {
            label: label.into(),
            score,
        }
    }

    #[test]
    fn low_confidence_collapses_to_neutral() {
        for label in ["POSITIVE", "NEGATIVE", "NEUTRAL", "LABEL_3"] {
            for score in [0.0, 0.5, 0.74, 0.7499] {
                assert_eq!(
                    resolve_sentiment(&prediction(label, score)),
                    Sentiment::Neutral,
                    "{label} @ {score}"
                );
            }
        }
    }

    #[test]
    fn confident_labels_pass_through() {
        assert_eq!(resolve_sentiment(&prediction("POSITIVE", 0.75)), Sentiment::Positive);
        assert_eq!(resolve_sentiment(&prediction("negative", 0.99)), Sentiment::Negative);
        assert_eq!(resolve_sentiment(&prediction("LABEL_1", 0.99)), Sentiment::Neutral);
    }

    #[test]
    fn tone_lookup_defaults_to_neutral() {
        assert_eq!(tone_for("POSITIVE"), "joyful and uplifting");
        assert_eq!(tone_for("positive"), "joyful and uplifting");
        assert_eq!(tone_for("NEGATIVE"), "melancholic and reflective");
        assert_eq!(tone_for("NEUTRAL"), "neutral and descriptive");
        assert_eq!(tone_for("ERROR"), "neutral and descriptive");
        assert_eq!(tone_for("something else"), "neutral and descriptive");
        assert_eq!(Sentiment::Positive.tone(), "joyful and uplifting");
    }

    #[test]
    fn craft_prompt_is_deterministic() {
        let first = craft_prompt("a sunny beach day", "POSITIVE");
        let second = craft_prompt("a sunny beach day", "POSITIVE");
        assert_eq!(first, second);
        assert_eq!(
            first,
            "Write a single, coherent paragraph in a joyful and uplifting tone about the following topic:\na sunny beach day"
        );
    }

    #[test]
    fn classifier_input_truncates_by_chars() {
        let short = "rain on the roof";
        assert_eq!(classifier_input(short), short);

        let long: String = "é".repeat(600);
        let truncated = classifier_input(&long);
        assert_eq!(truncated.chars().count(), CLASSIFIER_CHAR_LIMIT);

        let exact: String = "a".repeat(CLASSIFIER_CHAR_LIMIT);
        assert_eq!(classifier_input(&exact), exact);
    }

    #[test]
    fn cleanup_strips_dash_suffix() {
        assert_eq!(clean_generation("Hello world.\n---\njunk"), "Hello world.");
        assert_eq!(clean_generation("  A calm sea. --- --- ---"), "A calm sea.");
        assert_eq!(clean_generation("---everything is junk"), "");
        assert_eq!(clean_generation("  plain text \n"), "plain text");
        assert_eq!(clean_generation("a well---kept secret"), "a well---kept secret");
    }

    #[test]
    fn length_mapping_is_exact() {
        assert_eq!(OutputLength::Short.max_tokens(), 80);
        assert_eq!(OutputLength::Medium.max_tokens(), 200);
        assert_eq!(OutputLength::Long.max_tokens(), 380);
        assert_eq!(OutputLength::default(), OutputLength::Medium);
    }

    #[test]
    fn sentiment_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Sentiment::Positive).unwrap(), "\"POSITIVE\"");
        assert_eq!(Sentiment::Error.to_string(), "ERROR");
    }
}
