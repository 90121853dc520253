use std::sync::Mutex;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::debug;

use super::model::TextGenerationModel;
use super::params::{apply_repeat_penalty, GenerationParams};
use crate::error::{PipelineError, Result};
use crate::pipelines::stats::GenerationStats;

/// Generated text plus execution statistics.
#[derive(Debug)]
pub struct Output {
    /// Decoded text, special tokens skipped.
    pub text: String,
    /// Execution statistics.
    pub stats: GenerationStats,
}

// ============ Object-safe trait for runtime dispatch ============

/// Object-safe generation interface.
///
/// Lets callers hold any generator behind `Box<dyn TextGeneration>`,
/// whatever model backs it.
pub trait TextGeneration: Send + Sync {
    /// Generate at most `max_len` new tokens from `prompt`.
    fn generate(&self, prompt: &str, max_len: usize) -> Result<String>;
}

// ============ Pipeline ============

/// Pipeline for generating text from an instruction prompt.
///
/// Created via [`TextGenerationPipelineBuilder`](super::TextGenerationPipelineBuilder).
///
/// # Example
///
/// ```rust,no_run
/// use sentiment_writer::text_generation::{FlanT5Size, TextGenerationPipelineBuilder};
///
/// # fn example() -> sentiment_writer::error::Result<()> {
/// let pipeline = TextGenerationPipelineBuilder::flan_t5(FlanT5Size::Small.into()).build()?;
///
/// let output = pipeline.run_with_max_len("Write a short poem about Rust.", 80)?;
/// println!("{}", output.text);
/// # Ok(())
/// # }
/// ```
pub struct TextGenerationPipeline<M: TextGenerationModel> {
    // The KV cache makes forward passes `&mut`; concurrent calls serialize here.
    model: Mutex<M>,
    tokenizer: Tokenizer,
    params: GenerationParams,
    device: Device,
}

impl<M: TextGenerationModel> TextGenerationPipeline<M> {
    pub(crate) fn new(
        model: M,
        tokenizer: Tokenizer,
        params: GenerationParams,
        device: Device,
    ) -> Self {
        Self {
            model: Mutex::new(model),
            tokenizer,
            params,
            device,
        }
    }

    /// The sampling parameters every call uses.
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Generate up to the configured `max_len` tokens.
    pub fn run(&self, prompt: &str) -> Result<Output> {
        self.run_with_max_len(prompt, self.params.max_len)
    }

    /// Generate up to `max_len` new tokens.
    pub fn run_with_max_len(&self, prompt: &str, max_len: usize) -> Result<Output> {
        let mut stats = GenerationStats::new();

        let encoding = self.tokenizer.encode(prompt, true).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &prompt.chars().take(50).collect::<String>(),
                e
            ))
        })?;
        let prompt_ids = encoding.get_ids();
        stats.set_prompt_tokens(prompt_ids.len());

        let mut model = self.model.lock().map_err(|_| {
            PipelineError::Unexpected("Text generation model lock poisoned".to_string())
        })?;

        let generated = self.sample(&mut model, prompt_ids, max_len, &mut stats);
        // Each call starts from a fresh cache, even after a failed one.
        model.clear_cache();
        let generated = generated?;

        let text = self
            .tokenizer
            .decode(&generated, true)
            .map_err(|e| PipelineError::Tokenization(format!("Decode error: {}", e)))?;

        stats.finalize();
        debug!(
            prompt_tokens = stats.prompt_tokens,
            tokens = stats.tokens_generated,
            tokens_per_second = stats.tokens_per_second,
            elapsed_ms = stats.total_time.as_millis() as u64,
            "generated text"
        );

        Ok(Output { text, stats })
    }

    fn sample(
        &self,
        model: &mut M,
        prompt_ids: &[u32],
        max_len: usize,
        stats: &mut GenerationStats,
    ) -> Result<Vec<u32>> {
        let mut logits_processor = self.params.logits_processor();

        let input_ids = Tensor::new(prompt_ids, &self.device)?.unsqueeze(0)?;
        let encoder_output = model.encode(&input_ids)?;

        let eos_token = model.eos_token();
        let mut decoder_tokens: Vec<u32> = Vec::with_capacity(max_len + 1);
        decoder_tokens.push(model.decoder_start_token());

        for step in 0..max_len {
            let decoder_input = if step == 0 || !model.uses_cache() {
                Tensor::new(decoder_tokens.as_slice(), &self.device)?.unsqueeze(0)?
            } else {
                let last = decoder_tokens[decoder_tokens.len() - 1];
                Tensor::new(&[last], &self.device)?.unsqueeze(0)?
            };

            let logits = model.decode(&decoder_input, &encoder_output)?.squeeze(0)?;

            let generated = &decoder_tokens[1..];
            let start_at = generated.len().saturating_sub(self.params.repeat_last_n);
            let penalty_context = &generated[start_at..];

            let logits = if self.params.repeat_penalty <= 1. || penalty_context.is_empty() {
                logits
            } else {
                apply_repeat_penalty(&logits, self.params.repeat_penalty, penalty_context)?
            };

            let next_token = logits_processor.sample(&logits)?;
            stats.record_token();

            if next_token == eos_token {
                break;
            }
            decoder_tokens.push(next_token);
        }

        decoder_tokens.remove(0);
        Ok(decoder_tokens)
    }
}

impl<M> TextGeneration for TextGenerationPipeline<M>
where
    M: TextGenerationModel + Send,
{
    fn generate(&self, prompt: &str, max_len: usize) -> Result<String> {
        self.run_with_max_len(prompt, max_len).map(|output| output.text)
    }
}
