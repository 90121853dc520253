use super::model::SentimentAnalysisModel;
use crate::error::Result;
use crate::pipelines::stats::PipelineStats;
use tokenizers::Tokenizer;
use tracing::debug;

// ============ Output types ============

/// A sentiment prediction with label and confidence score.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// The predicted class as named by the model's `id2label` (e.g. "POSITIVE").
    pub label: String,
    /// Confidence score (0.0 to 1.0).
    pub score: f32,
}

/// Output from `run()`.
#[derive(Debug)]
pub struct Output {
    /// Sentiment prediction.
    pub prediction: Prediction,
    /// Execution statistics.
    pub stats: PipelineStats,
}

// ============ Object-safe trait for runtime dispatch ============

/// Object-safe classification interface.
///
/// Lets callers hold any classifier behind `Box<dyn SentimentAnalysis>`,
/// whatever model backs it.
pub trait SentimentAnalysis: Send + Sync {
    /// Classify `text`, returning the top label and its score.
    fn classify(&self, text: &str) -> Result<Prediction>;
}

// ============ Pipeline ============

/// Classifies text sentiment.
///
/// Construct with [`SentimentAnalysisPipelineBuilder`](super::SentimentAnalysisPipelineBuilder).
///
/// # Examples
///
/// ```rust,no_run
/// # use sentiment_writer::sentiment::{DistilBertOptions, SentimentAnalysisPipelineBuilder};
/// # fn main() -> sentiment_writer::error::Result<()> {
/// let pipeline = SentimentAnalysisPipelineBuilder::distilbert(DistilBertOptions::default()).build()?;
///
/// let output = pipeline.run("I love this product!")?;
/// println!("{}: {:.2}", output.prediction.label, output.prediction.score);
/// # Ok(())
/// # }
/// ```
pub struct SentimentAnalysisPipeline<M: SentimentAnalysisModel> {
    pub(crate) model: M,
    pub(crate) tokenizer: Tokenizer,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipeline<M> {
    /// Analyze text sentiment.
    pub fn run(&self, text: &str) -> Result<Output> {
        let stats_builder = PipelineStats::start();

        let result = self.model.predict_with_score(&self.tokenizer, text)?;
        let stats = stats_builder.finish(result.input_tokens);

        debug!(
            label = %result.label,
            score = result.score,
            tokens = stats.input_tokens,
            elapsed_ms = stats.total_time.as_millis() as u64,
            "classified text"
        );

        Ok(Output {
            prediction: Prediction {
                label: result.label,
                score: result.score,
            },
            stats,
        })
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}

impl<M> SentimentAnalysis for SentimentAnalysisPipeline<M>
where
    M: SentimentAnalysisModel + Send + Sync,
{
    fn classify(&self, text: &str) -> Result<Prediction> {
        self.run(text).map(|output| output.prediction)
    }
}
