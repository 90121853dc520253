use candle_core::{Device, Tensor};
use candle_transformers::models::t5::{Config, T5ForConditionalGeneration};
use tokenizers::Tokenizer;

use crate::error::{PipelineError, Result};
use crate::loaders::{TokenizerLoader, WeightsLoader};
use crate::pipelines::text_generation::TextGenerationModel;

/// Default instruction-tuned generator.
pub const DEFAULT_GENERATION_REPO: &str = "google/flan-t5-small";

/// Available FLAN-T5 model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlanT5Size {
    /// ~80M parameters.
    Small,
    /// ~250M parameters.
    Base,
    /// ~780M parameters.
    Large,
}

impl FlanT5Size {
    pub fn repo_id(self) -> &'static str {
        match self {
            FlanT5Size::Small => DEFAULT_GENERATION_REPO,
            FlanT5Size::Base => "google/flan-t5-base",
            FlanT5Size::Large => "google/flan-t5-large",
        }
    }
}

/// Where to fetch a T5-family text-to-text model from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlanT5Options {
    pub repo: String,
}

impl Default for FlanT5Options {
    fn default() -> Self {
        FlanT5Size::Small.into()
    }
}

impl From<FlanT5Size> for FlanT5Options {
    fn from(size: FlanT5Size) -> Self {
        Self {
            repo: size.repo_id().into(),
        }
    }
}

impl std::fmt::Display for FlanT5Options {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.repo)
    }
}

pub struct FlanT5Model {
    model: T5ForConditionalGeneration,
    decoder_start_token: u32,
    eos_token: u32,
    use_cache: bool,
}

impl FlanT5Model {
    pub fn new(options: FlanT5Options, device: Device) -> Result<Self> {
        let loader = WeightsLoader::new(&options.repo);

        let mut config: Config = serde_json::from_str(&loader.load_config()?)?;
        config.use_cache = true;

        let decoder_start_token = config
            .decoder_start_token_id
            .unwrap_or(config.pad_token_id);
        let decoder_start_token = u32::try_from(decoder_start_token).map_err(|_| {
            PipelineError::ModelConfig(format!(
                "'{}' has an out-of-range decoder_start_token_id",
                options.repo
            ))
        })?;
        let eos_token = u32::try_from(config.eos_token_id).map_err(|_| {
            PipelineError::ModelConfig(format!(
                "'{}' has an out-of-range eos_token_id",
                options.repo
            ))
        })?;

        let vb = loader.load_weights(&device)?;
        let model = T5ForConditionalGeneration::load(vb, &config)?;

        Ok(Self {
            model,
            decoder_start_token,
            eos_token,
            use_cache: config.use_cache,
        })
    }
}

impl TextGenerationModel for FlanT5Model {
    type Options = FlanT5Options;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        FlanT5Model::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        TokenizerLoader::new(&options.repo).load()
    }

    fn encode(&mut self, input_ids: &Tensor) -> Result<Tensor> {
        Ok(self.model.encode(input_ids)?)
    }

    fn decode(&mut self, decoder_input_ids: &Tensor, encoder_output: &Tensor) -> Result<Tensor> {
        Ok(self.model.decode(decoder_input_ids, encoder_output)?)
    }

    fn decoder_start_token(&self) -> u32 {
        self.decoder_start_token
    }

    fn eos_token(&self) -> u32 {
        self.eos_token
    }

    fn uses_cache(&self) -> bool {
        self.use_cache
    }

    fn clear_cache(&mut self) {
        self.model.clear_kv_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_map_to_google_repos() {
        assert_eq!(FlanT5Options::default().repo, "google/flan-t5-small");
        assert_eq!(FlanT5Options::from(FlanT5Size::Large).repo, "google/flan-t5-large");
    }
}
