use sentiment_writer::error::Result;
use sentiment_writer::text_generation::{FlanT5Size, TextGenerationPipelineBuilder};
use sentiment_writer::writer::{clean_generation, craft_prompt, OutputLength};

fn main() -> Result<()> {
    println!("Building pipeline...");

    // Sampling defaults are top-k 50, top-p 0.95, temperature 0.8.
    // A pinned seed makes the run repeatable.
    let pipeline = TextGenerationPipelineBuilder::flan_t5(FlanT5Size::Small.into())
        .seed(42)
        .max_len(OutputLength::Medium.max_tokens())
        .build()?;

    println!("Pipeline built successfully.");

    let output = pipeline.run("Explain why the sky is blue in two sentences.")?;

    println!("\n=== Generated Text ===");
    println!("{}", output.text);
    println!(
        "\n[{} tokens in {:.2}s ({:.1} tok/s)]",
        output.stats.tokens_generated,
        output.stats.total_time.as_secs_f64(),
        output.stats.tokens_per_second
    );

    // The same instruction the writer sends for a joyful prompt, at each length.
    let instruction = craft_prompt("a sunny beach day", "POSITIVE");
    for length in OutputLength::ALL {
        let output = pipeline.run_with_max_len(&instruction, length.max_tokens())?;
        println!("\n=== {} ===", length.label());
        println!("{}", clean_generation(&output.text));
    }

    Ok(())
}
