//! Errors raised while loading or running the models.
//!
//! Loading can fail on the network, on a repo that is not what the pipeline
//! expects, or on a CUDA device the build cannot reach. Inference can only fail
//! on tokenization or inside Candle.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`PipelineError`] as the error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Model loading and inference failures.
///
/// The web UI never matches on these: load failures are shown as a banner and
/// the app keeps running without models. Library callers can tell a bad
/// configuration apart from a transient failure:
///
/// ```rust,no_run
/// use sentiment_writer::error::PipelineError;
/// use sentiment_writer::sentiment::{DistilBertOptions, SentimentAnalysisPipelineBuilder};
///
/// let options = DistilBertOptions {
///     model_repo: "distilbert/distilbert-base-uncased".into(),
///     ..Default::default()
/// };
/// match SentimentAnalysisPipelineBuilder::distilbert(options).cuda(0).build() {
///     Ok(_) => {}
///     // Base checkpoint without a classification head.
///     Err(PipelineError::ModelConfig(msg)) => eprintln!("pick a fine-tuned repo: {msg}"),
///     // Built without the `cuda` feature, or no GPU at that index.
///     Err(PipelineError::Device(msg)) => eprintln!("falling back to CPU: {msg}"),
///     Err(PipelineError::Download(msg)) => eprintln!("hub unreachable: {msg}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// A hub file could not be fetched.
    #[error("{0}")]
    Download(String),

    /// The tokenizer could not be loaded, or rejected the input.
    #[error("{0}")]
    Tokenization(String),

    /// The requested device is unavailable.
    #[error("{0}")]
    Device(String),

    /// The repo lacks a config field the model needs, usually a wrong repo id.
    #[error("{0}")]
    ModelConfig(String),

    /// Anything raised inside Candle, or an I/O or JSON failure.
    #[error("{0}")]
    Unexpected(String),
}

impl From<hf_hub::api::sync::ApiError> for PipelineError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        PipelineError::Download(format!("HuggingFace API error: {value}"))
    }
}

impl From<candle_core::Error> for PipelineError {
    fn from(value: candle_core::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}
