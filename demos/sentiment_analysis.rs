use sentiment_writer::error::Result;
use sentiment_writer::sentiment::{DistilBertOptions, SentimentAnalysisPipelineBuilder};
use sentiment_writer::writer::resolve_sentiment;

fn main() -> Result<()> {
    println!("Building pipeline...");

    let pipeline = SentimentAnalysisPipelineBuilder::distilbert(DistilBertOptions::default()).build()?;

    println!("Pipeline built successfully.");

    let texts = [
        "a sunny beach day with friends",
        "the train was cancelled again and it is raining",
        "the meeting moved to room 4",
    ];

    println!("\n=== Sentiment Analysis ===");
    for text in texts {
        let output = pipeline.run(text)?;
        // What the writer would pick after the confidence threshold.
        let resolved = resolve_sentiment(&output.prediction);
        println!(
            "{text:?}\n  raw: {} ({:.4})  resolved: {resolved}  [{} tokens, {:.2}ms]",
            output.prediction.label,
            output.prediction.score,
            output.stats.input_tokens,
            output.stats.total_time.as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
