//! Text generation pipeline for instruction-tuned encoder-decoder models.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sentiment_writer::text_generation::{FlanT5Size, TextGenerationPipelineBuilder};
//!
//! # fn main() -> sentiment_writer::error::Result<()> {
//! let pipeline = TextGenerationPipelineBuilder::flan_t5(FlanT5Size::Small.into()).build()?;
//!
//! let output = pipeline.run("Write a sentence about the sea.")?;
//! println!("{}", output.text);
//! println!("Generated {} tokens in {:.2}s", output.stats.tokens_generated, output.stats.total_time.as_secs_f64());
//! # Ok(())
//! # }
//! ```
//!
//! # Generation Parameters
//!
//! Sampling is on by default (top-k 50, top-p 0.95, temperature 0.8) and the
//! seed is drawn per call, so identical prompts give different text. Pin a
//! seed with [`TextGenerationPipelineBuilder::seed`] for reproducible runs.
//!
//! # Supported Models
//!
//! | Model | Sizes | Builder Method |
//! |-------|-------|----------------|
//! | FLAN-T5 | `Small`, `Base`, `Large` | [`TextGenerationPipelineBuilder::flan_t5`] |

// ============ Internal API ============

pub(crate) mod builder;
pub(crate) mod model;
pub(crate) mod params;
pub(crate) mod pipeline;

// ============ Public API ============

pub use crate::models::{FlanT5Model, FlanT5Options, FlanT5Size};
pub use crate::pipelines::stats::GenerationStats;
pub use builder::TextGenerationPipelineBuilder;
pub use model::TextGenerationModel;
pub use params::GenerationParams;
pub use pipeline::{Output, TextGeneration, TextGenerationPipeline};
