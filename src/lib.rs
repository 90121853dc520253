//! # Sentiment Writer
//!
//! Detect the sentiment of a prompt and write a paragraph in a matching tone,
//! with local Candle models: a DistilBERT classifier and a FLAN-T5 generator.
//!
//! The [`writer`] module holds the flow (classify, pick a tone, generate,
//! clean up) and per-session history. [`web`] serves it as a small browser UI.
//! The [`sentiment`] and [`text_generation`] pipelines can also be used alone.

pub mod config;
pub mod error;
pub(crate) mod loaders;
pub(crate) mod models;
pub mod pipelines;
pub mod web;
pub mod writer;

pub use error::{PipelineError, Result};
pub use pipelines::{sentiment, text_generation};
pub use pipelines::utils::DeviceRequest;
