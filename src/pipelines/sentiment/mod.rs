//! Sentiment analysis pipeline.
//!
//! Classify text with a fine-tuned sequence classifier.
//! Returns both the predicted label and a confidence score.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sentiment_writer::sentiment::{DistilBertOptions, SentimentAnalysisPipelineBuilder};
//!
//! # fn main() -> sentiment_writer::error::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::distilbert(DistilBertOptions::default()).build()?;
//!
//! let output = pipeline.run("I absolutely love this product!")?;
//! println!("sentiment: {} (confidence: {:.2})", output.prediction.label, output.prediction.score);
//! # Ok(())
//! # }
//! ```
//!
//! # Supported Models
//!
//! | Model | Default repo | Builder Method |
//! |-------|--------------|----------------|
//! | DistilBERT | `distilbert/distilbert-base-uncased-finetuned-sst-2-english` | [`SentimentAnalysisPipelineBuilder::distilbert`] |

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod model;
pub(crate) mod pipeline;

// ============ Public API ============

pub use crate::models::{DistilBertOptions, DistilBertSentimentModel};
pub use crate::pipelines::stats::PipelineStats;
pub use builder::SentimentAnalysisPipelineBuilder;
pub use model::{SentimentAnalysisModel, SentimentResult};
pub use pipeline::{Output, Prediction, SentimentAnalysis, SentimentAnalysisPipeline};
