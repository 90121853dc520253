#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use sentiment_writer::error::{PipelineError, Result};
use sentiment_writer::sentiment::{Prediction, SentimentAnalysis};
use sentiment_writer::text_generation::TextGeneration;
use sentiment_writer::writer::{Models, Writer};

/// Returns the same prediction for every input and remembers what it saw.
pub struct FakeClassifier {
    pub label: String,
    pub score: f32,
    pub seen: Arc<Mutex<Vec<String>>>,
}

impl SentimentAnalysis for FakeClassifier {
    fn classify(&self, text: &str) -> Result<Prediction> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(Prediction {
            label: self.label.clone(),
            score: self.score,
        })
    }
}

/// Replies with a fixed text and records `(prompt, max_len)` per call.
pub struct FakeGenerator {
    pub reply: Option<String>,
    pub calls: Arc<Mutex<Vec<(String, usize)>>>,
}

impl TextGeneration for FakeGenerator {
    fn generate(&self, prompt: &str, max_len: usize) -> Result<String> {
        self.calls.lock().unwrap().push((prompt.to_string(), max_len));
        self.reply
            .clone()
            .ok_or_else(|| PipelineError::Unexpected("generator unavailable".into()))
    }
}

pub struct Harness {
    pub writer: Writer,
    pub classified: Arc<Mutex<Vec<String>>>,
    pub generated: Arc<Mutex<Vec<(String, usize)>>>,
}

/// A writer backed by fakes. `reply: None` makes every generation fail.
pub fn harness(label: &str, score: f32, reply: Option<&str>) -> Harness {
    let classified = Arc::new(Mutex::new(Vec::new()));
    let generated = Arc::new(Mutex::new(Vec::new()));
    let models = Models::new(
        Box::new(FakeClassifier {
            label: label.to_string(),
            score,
            seen: classified.clone(),
        }),
        Box::new(FakeGenerator {
            reply: reply.map(str::to_string),
            calls: generated.clone(),
        }),
    );

    Harness {
        writer: Writer::new(models),
        classified,
        generated,
    }
}
