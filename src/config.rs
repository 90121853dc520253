//! Command-line and environment configuration.

use std::net::{IpAddr, SocketAddr};

use clap::Parser;

use crate::models::{
    DistilBertOptions, FlanT5Options, DEFAULT_GENERATION_REPO, DEFAULT_SENTIMENT_REPO,
    DEFAULT_SENTIMENT_TOKENIZER_REPO,
};
use crate::pipelines::utils::DeviceRequest;
use crate::writer::ModelSettings;

/// Sentiment-aligned writer: classify a prompt, then write in its tone.
#[derive(Debug, Clone, Parser)]
#[command(name = "sentiment-writer", version, about)]
pub struct Config {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 10000)]
    pub port: u16,

    /// Hugging Face repo of the sentiment classifier.
    #[arg(long, env = "SENTIMENT_MODEL", default_value = DEFAULT_SENTIMENT_REPO)]
    pub sentiment_model: String,

    /// Repo to take the classifier's `tokenizer.json` from.
    #[arg(long, env = "SENTIMENT_TOKENIZER", default_value = DEFAULT_SENTIMENT_TOKENIZER_REPO)]
    pub sentiment_tokenizer: String,

    /// Hugging Face repo of the text-to-text generator.
    #[arg(long, env = "GENERATION_MODEL", default_value = DEFAULT_GENERATION_REPO)]
    pub generation_model: String,

    /// Run both models on this CUDA device instead of the CPU.
    #[arg(long, env = "CUDA_DEVICE")]
    pub cuda: Option<usize>,
}

impl Config {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn model_settings(&self) -> ModelSettings {
        ModelSettings {
            sentiment: DistilBertOptions {
                model_repo: self.sentiment_model.clone(),
                tokenizer_repo: self.sentiment_tokenizer.clone(),
            },
            generation: FlanT5Options {
                repo: self.generation_model.clone(),
            },
            device: DeviceRequest::from(self.cuda),
        }
    }
}
