use crate::error::Result;
use candle_core::Device;
use tokenizers::Tokenizer;

/// Raw classifier output: the arg-max label and its softmax probability.
#[derive(Debug, Clone)]
pub struct SentimentResult {
    pub label: String,
    pub score: f32,
    /// Tokens fed to the model after tokenizer truncation.
    pub input_tokens: usize,
}

pub trait SentimentAnalysisModel {
    type Options: std::fmt::Debug + Clone;

    fn new(options: Self::Options, device: Device) -> Result<Self>
    where
        Self: Sized;

    fn predict_with_score(&self, tokenizer: &Tokenizer, text: &str) -> Result<SentimentResult>;

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    fn device(&self) -> &Device;
}
