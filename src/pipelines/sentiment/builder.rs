use super::model::SentimentAnalysisModel;
use super::pipeline::SentimentAnalysisPipeline;
use crate::error::Result;
use crate::models::{DistilBertOptions, DistilBertSentimentModel};
use crate::pipelines::utils::DeviceRequest;
use tracing::info;

crate::pipelines::utils::impl_device_methods!(SentimentAnalysisPipelineBuilder<M: SentimentAnalysisModel>);

/// Builder for [`SentimentAnalysisPipeline`].
pub struct SentimentAnalysisPipelineBuilder<M: SentimentAnalysisModel> {
    options: M::Options,
    device_request: DeviceRequest,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipelineBuilder<M> {
    /// Create a builder with the given model options.
    pub fn new(options: M::Options) -> Self {
        Self {
            options,
            device_request: DeviceRequest::Cpu,
        }
    }

    /// Download (if needed) and load the model and tokenizer.
    pub fn build(self) -> Result<SentimentAnalysisPipeline<M>> {
        let device = self.device_request.resolve()?;
        info!(options = ?self.options, device = ?self.device_request, "loading sentiment model");

        let model = M::new(self.options.clone(), device)?;
        let tokenizer = M::get_tokenizer(self.options)?;

        Ok(SentimentAnalysisPipeline { model, tokenizer })
    }
}

impl SentimentAnalysisPipelineBuilder<DistilBertSentimentModel> {
    /// Create a builder for a DistilBERT sequence classifier.
    pub fn distilbert(options: DistilBertOptions) -> Self {
        Self::new(options)
    }
}
