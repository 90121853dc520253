use chrono::{DateTime, Local};
use serde::Serialize;

use super::tone::Sentiment;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One completed pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    /// 1-based position within its session.
    pub seq: usize,
    pub prompt: String,
    pub detected_sentiment: Sentiment,
    pub generated_text: String,
    /// Local time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    #[serde(skip)]
    created_at: DateTime<Local>,
}

impl Interaction {
    /// File name offered when the record is downloaded from the history list.
    pub fn history_file_name(&self) -> String {
        format!("generation_{}.txt", self.seq)
    }

    /// File name offered when the latest result is downloaded.
    pub fn result_file_name(&self) -> String {
        format!(
            "generated_{}_{}.txt",
            self.detected_sentiment.as_str().to_ascii_lowercase(),
            self.created_at.timestamp()
        )
    }
}

/// Append-only, ordered record of a session's interactions.
#[derive(Debug, Default, Clone)]
pub struct History {
    entries: Vec<Interaction>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with the current local time.
    pub fn record(
        &mut self,
        prompt: impl Into<String>,
        detected_sentiment: Sentiment,
        generated_text: impl Into<String>,
    ) -> &Interaction {
        self.record_at(prompt, detected_sentiment, generated_text, Local::now())
    }

    pub(crate) fn record_at(
        &mut self,
        prompt: impl Into<String>,
        detected_sentiment: Sentiment,
        generated_text: impl Into<String>,
        created_at: DateTime<Local>,
    ) -> &Interaction {
        let generated_text: String = generated_text.into();
        let seq = self.entries.len() + 1;
        self.entries.push(Interaction {
            seq,
            prompt: prompt.into(),
            detected_sentiment,
            generated_text: generated_text.trim().to_string(),
            timestamp: created_at.format(TIMESTAMP_FORMAT).to_string(),
            created_at,
        });
        &self.entries[seq - 1]
    }

    /// Records in submission order.
    pub fn entries(&self) -> &[Interaction] {
        &self.entries
    }

    /// Records newest first, as the history column shows them.
    pub fn recent_first(&self) -> impl Iterator<Item = &Interaction> {
        self.entries.iter().rev()
    }

    pub fn get(&self, seq: usize) -> Option<&Interaction> {
        seq.checked_sub(1).and_then(|idx| self.entries.get(idx))
    }

    pub fn latest(&self) -> Option<&Interaction> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn records_keep_submission_order() {
        let mut history = History::new();
        for i in 0..4 {
            history.record(format!("prompt {i}"), Sentiment::Neutral, "text");
        }

        assert_eq!(history.len(), 4);
        let seqs: Vec<_> = history.entries().iter().map(|r| r.seq).collect();
        assert_eq!(seqs, [1, 2, 3, 4]);

        let newest_first: Vec<_> = history.recent_first().map(|r| r.prompt.as_str()).collect();
        assert_eq!(newest_first, ["prompt 3", "prompt 2", "prompt 1", "prompt 0"]);
        assert_eq!(history.latest().map(|r| r.seq), Some(4));
    }

    #[test]
    fn lookup_is_one_based() {
        let mut history = History::new();
        history.record("first", Sentiment::Positive, "a");

        assert!(history.get(0).is_none());
        assert_eq!(history.get(1).map(|r| r.prompt.as_str()), Some("first"));
        assert!(history.get(2).is_none());
    }

    #[test]
    fn generated_text_is_trimmed() {
        let mut history = History::new();
        let record = history.record("p", Sentiment::Negative, "  grey skies \n");
        assert_eq!(record.generated_text, "grey skies");
    }

    #[test]
    fn timestamp_and_file_names() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let mut history = History::new();
        let record = history
            .record_at("beach", Sentiment::Positive, "sunny", at)
            .clone();

        assert_eq!(record.timestamp, "2024-03-09 14:05:07");
        assert_eq!(record.history_file_name(), "generation_1.txt");
        assert_eq!(
            record.result_file_name(),
            format!("generated_positive_{}.txt", at.timestamp())
        );
    }
}
