//! End-to-end writer run against the real models.
//! Run with: cargo test --features integration

#![cfg(feature = "integration")]

use sentiment_writer::writer::{ModelSettings, OutputLength, Sentiment, Writer};

#[test]
fn writer_end_to_end() -> anyhow::Result<()> {
    let writer = Writer::load(&ModelSettings::default());
    assert!(writer.models_loaded(), "{:?}", writer.load_error());

    let out = writer.analyze_and_generate(
        "a sunny beach day with friends",
        OutputLength::Short.max_tokens(),
    )?;
    assert_ne!(out.sentiment, Sentiment::Error);
    assert_eq!(out.text, out.text.trim());
    assert!(!out.text.contains("\n---"));
    Ok(())
}
