use tracing::{debug, error, info};

use super::tone::{
    classifier_input, clean_generation, craft_prompt, resolve_sentiment, Sentiment,
};
use crate::error::Result;
use crate::models::{DistilBertOptions, FlanT5Options};
use crate::pipelines::sentiment::{SentimentAnalysis, SentimentAnalysisPipelineBuilder};
use crate::pipelines::text_generation::{TextGeneration, TextGenerationPipelineBuilder};
use crate::pipelines::utils::DeviceRequest;

/// Text returned when the models failed to load.
pub const MODELS_NOT_LOADED: &str = "Models not loaded.";

/// Text returned for an empty or whitespace-only prompt.
pub const EMPTY_PROMPT_PLACEHOLDER: &str = "Please provide a prompt.";

/// Which models to load, and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelSettings {
    pub sentiment: DistilBertOptions,
    pub generation: FlanT5Options,
    pub device: DeviceRequest,
}

/// The two loaded pipelines.
pub struct Models {
    pub sentiment: Box<dyn SentimentAnalysis>,
    pub generator: Box<dyn TextGeneration>,
}

impl Models {
    pub fn new(sentiment: Box<dyn SentimentAnalysis>, generator: Box<dyn TextGeneration>) -> Self {
        Self {
            sentiment,
            generator,
        }
    }

    /// Download (if needed) and load both pipelines.
    pub fn load(settings: &ModelSettings) -> Result<Self> {
        let sentiment = SentimentAnalysisPipelineBuilder::distilbert(settings.sentiment.clone())
            .device(settings.device)
            .build()?;
        let generator = TextGenerationPipelineBuilder::flan_t5(settings.generation.clone())
            .device(settings.device)
            .build()?;

        Ok(Self::new(Box::new(sentiment), Box::new(generator)))
    }
}

/// Outcome of one writer run.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub sentiment: Sentiment,
    pub text: String,
}

/// Classifies a prompt and writes a paragraph in the matching tone.
///
/// Built once at startup and shared by every request. When loading failed the
/// writer still exists, answers every call with [`Sentiment::Error`], and keeps
/// the load error for display.
pub struct Writer {
    models: Option<Models>,
    load_error: Option<String>,
}

impl Writer {
    pub fn new(models: Models) -> Self {
        Self {
            models: Some(models),
            load_error: None,
        }
    }

    /// A writer with no models, carrying the reason they are missing.
    pub fn without_models(load_error: impl Into<String>) -> Self {
        Self {
            models: None,
            load_error: Some(load_error.into()),
        }
    }

    /// Load the models, logging and keeping the failure instead of returning it.
    pub fn load(settings: &ModelSettings) -> Self {
        match Models::load(settings) {
            Ok(models) => {
                info!("models loaded");
                Self::new(models)
            }
            Err(e) => {
                error!(error = %e, "failed to load models");
                Self::without_models(format!("Error loading models: {e}"))
            }
        }
    }

    pub fn models_loaded(&self) -> bool {
        self.models.is_some()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Detect the prompt's sentiment and generate up to `max_len` tokens in its tone.
    ///
    /// The classifier only sees the first 512 characters. The generator gets
    /// the whole prompt. Model failures are returned as errors.
    pub fn analyze_and_generate(&self, prompt: &str, max_len: usize) -> Result<Generation> {
        let Some(models) = &self.models else {
            return Ok(Generation {
                sentiment: Sentiment::Error,
                text: MODELS_NOT_LOADED.to_string(),
            });
        };

        if prompt.trim().is_empty() {
            return Ok(Generation {
                sentiment: Sentiment::Neutral,
                text: EMPTY_PROMPT_PLACEHOLDER.to_string(),
            });
        }

        let prediction = models.sentiment.classify(classifier_input(prompt))?;
        let sentiment = resolve_sentiment(&prediction);
        debug!(
            label = %prediction.label,
            score = prediction.score,
            resolved = %sentiment,
            "classified prompt"
        );

        let instruction = craft_prompt(prompt, sentiment.as_str());
        let raw = models.generator.generate(&instruction, max_len)?;

        Ok(Generation {
            sentiment,
            text: clean_generation(&raw),
        })
    }
}
