use super::model::TextGenerationModel;
use super::params::GenerationParams;
use super::pipeline::TextGenerationPipeline;
use crate::error::Result;
use crate::models::{FlanT5Model, FlanT5Options};
use crate::pipelines::utils::DeviceRequest;
use tracing::info;

crate::pipelines::utils::impl_device_methods!(TextGenerationPipelineBuilder<M: TextGenerationModel>);

/// Builder for constructing [`TextGenerationPipeline`] instances.
///
/// # Example
///
/// ```rust,no_run
/// use sentiment_writer::text_generation::{FlanT5Size, TextGenerationPipelineBuilder};
///
/// # fn example() -> sentiment_writer::error::Result<()> {
/// let pipeline = TextGenerationPipelineBuilder::flan_t5(FlanT5Size::Small.into())
///     .temperature(0.8)
///     .top_k(50)
///     .top_p(0.95)
///     .max_len(200)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct TextGenerationPipelineBuilder<M: TextGenerationModel> {
    options: M::Options,
    params: GenerationParams,
    device_request: DeviceRequest,
}

impl<M: TextGenerationModel> TextGenerationPipelineBuilder<M> {
    /// Create a builder with the given model options and default sampling.
    pub fn new(options: M::Options) -> Self {
        Self {
            options,
            params: GenerationParams::default(),
            device_request: DeviceRequest::Cpu,
        }
    }

    /// Set sampling temperature. 0.0 = greedy, higher = more random.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.params.temperature = temperature;
        self
    }

    /// Only sample from the top k most likely tokens.
    pub fn top_k(mut self, top_k: usize) -> Self {
        self.params.top_k = Some(top_k);
        self
    }

    /// Set nucleus sampling threshold (0.0-1.0).
    pub fn top_p(mut self, top_p: f64) -> Self {
        self.params.top_p = Some(top_p.clamp(0.0, 1.0));
        self
    }

    /// Set penalty for repeating tokens. 1.0 = no penalty.
    pub fn repeat_penalty(mut self, repeat_penalty: f32) -> Self {
        self.params.repeat_penalty = repeat_penalty;
        self
    }

    /// Pin the random seed for reproducible generation.
    pub fn seed(mut self, seed: u64) -> Self {
        self.params.seed = Some(seed);
        self
    }

    /// Set the default maximum new tokens for [`TextGenerationPipeline::run`].
    pub fn max_len(mut self, max_len: usize) -> Self {
        self.params.max_len = max_len;
        self
    }

    /// Build the pipeline, downloading and loading the model if needed.
    pub fn build(self) -> Result<TextGenerationPipeline<M>> {
        let device = self.device_request.resolve()?;
        info!(options = ?self.options, device = ?self.device_request, "loading generation model");

        let model = M::new(self.options.clone(), device.clone())?;
        let tokenizer = M::get_tokenizer(self.options)?;

        Ok(TextGenerationPipeline::new(
            model,
            tokenizer,
            self.params,
            device,
        ))
    }
}

impl TextGenerationPipelineBuilder<FlanT5Model> {
    /// Create a builder for a FLAN-T5 model.
    pub fn flan_t5(options: FlanT5Options) -> Self {
        Self::new(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setters_override_defaults() {
        let builder = TextGenerationPipelineBuilder::flan_t5(FlanT5Options::default())
            .temperature(0.2)
            .top_k(10)
            .top_p(1.7)
            .seed(7)
            .max_len(42)
            .cuda(0);

        assert_eq!(builder.params.temperature, 0.2);
        assert_eq!(builder.params.top_k, Some(10));
        assert_eq!(builder.params.top_p, Some(1.0));
        assert_eq!(builder.params.seed, Some(7));
        assert_eq!(builder.params.max_len, 42);
        assert_eq!(builder.device_request, DeviceRequest::Cuda(0));
    }
}
