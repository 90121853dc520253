//! Sentiment-aligned writing.
//!
//! A [`Writer`] classifies a prompt, picks a tone from the label and asks the
//! generator for a paragraph in that tone. [`History`] keeps what each session
//! produced.
//!
//! ```rust,no_run
//! use sentiment_writer::writer::{ModelSettings, OutputLength, Writer};
//!
//! # fn main() -> sentiment_writer::error::Result<()> {
//! let writer = Writer::load(&ModelSettings::default());
//! let out = writer.analyze_and_generate("a sunny beach day", OutputLength::Medium.max_tokens())?;
//! println!("[{}] {}", out.sentiment, out.text);
//! # Ok(())
//! # }
//! ```

mod history;
mod service;
mod tone;

pub use history::{History, Interaction};
pub use service::{
    Generation, ModelSettings, Models, Writer, EMPTY_PROMPT_PLACEHOLDER, MODELS_NOT_LOADED,
};
pub use tone::{
    classifier_input, clean_generation, craft_prompt, resolve_sentiment, tone_for, OutputLength,
    Sentiment, CLASSIFIER_CHAR_LIMIT, CONFIDENCE_THRESHOLD,
};
