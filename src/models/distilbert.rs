use std::collections::HashMap;

use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{linear, ops::softmax, Linear, Module};
use candle_transformers::models::distilbert::{Config, DistilBertModel};
use serde::Deserialize;
use tokenizers::Tokenizer;

use crate::error::{PipelineError, Result};
use crate::loaders::{TokenizerLoader, WeightsLoader};
use crate::pipelines::sentiment::{SentimentAnalysisModel, SentimentResult};

/// Binary SST-2 classifier (`NEGATIVE` / `POSITIVE`).
pub const DEFAULT_SENTIMENT_REPO: &str =
    "distilbert/distilbert-base-uncased-finetuned-sst-2-english";

/// The SST-2 repo ships no `tokenizer.json`; the base model's is identical.
pub const DEFAULT_SENTIMENT_TOKENIZER_REPO: &str = "distilbert/distilbert-base-uncased";

/// DistilBERT has 512 learned positions.
const MAX_INPUT_TOKENS: usize = 512;

/// Where to fetch a DistilBERT sequence classifier from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistilBertOptions {
    /// Repo holding `config.json` (with `id2label`) and the weights.
    pub model_repo: String,
    /// Repo holding `tokenizer.json`.
    pub tokenizer_repo: String,
}

impl Default for DistilBertOptions {
    fn default() -> Self {
        Self {
            model_repo: DEFAULT_SENTIMENT_REPO.into(),
            tokenizer_repo: DEFAULT_SENTIMENT_TOKENIZER_REPO.into(),
        }
    }
}

impl std::fmt::Display for DistilBertOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model_repo)
    }
}

#[derive(Deserialize)]
struct ClassifierConfigJson {
    dim: usize,
    #[serde(default)]
    id2label: HashMap<String, String>,
}

/// DistilBERT encoder plus the `pre_classifier -> ReLU -> classifier` head
/// used by `DistilBertForSequenceClassification`.
pub struct DistilBertSentimentModel {
    model: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    id2label: HashMap<String, String>,
    device: Device,
}

impl DistilBertSentimentModel {
    pub fn new(options: DistilBertOptions, device: Device) -> Result<Self> {
        let loader = WeightsLoader::new(&options.model_repo);

        let config_str = loader.load_config()?;
        let config: Config = serde_json::from_str(&config_str)?;
        let class_cfg: ClassifierConfigJson = serde_json::from_str(&config_str)?;

        if class_cfg.id2label.is_empty() {
            return Err(PipelineError::ModelConfig(format!(
                "'{}' has no id2label in config.json; it is not a sequence classifier",
                options.model_repo
            )));
        }

        let vb = loader.load_weights(&device)?;
        let model = DistilBertModel::load(vb.pp("distilbert"), &config)?;
        let pre_classifier = linear(class_cfg.dim, class_cfg.dim, vb.pp("pre_classifier"))?;
        let classifier = linear(
            class_cfg.dim,
            class_cfg.id2label.len(),
            vb.pp("classifier"),
        )?;

        Ok(Self {
            model,
            pre_classifier,
            classifier,
            id2label: class_cfg.id2label,
            device,
        })
    }

    fn logits(&self, input_ids: &Tensor) -> Result<Tensor> {
        let seq_len = input_ids.dim(1)?;
        // Single unpadded sequence: nothing to mask.
        let mask = Tensor::zeros((seq_len, seq_len), DType::U8, &self.device)?;

        let hidden = self.model.forward(input_ids, &mask)?;
        let cls = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&cls)?.relu()?;
        Ok(self.classifier.forward(&pooled)?)
    }

    fn label_for(&self, pred_id: u32) -> Result<String> {
        self.id2label
            .get(&pred_id.to_string())
            .cloned()
            .ok_or_else(|| {
                let available: Vec<&str> = self.id2label.keys().map(String::as_str).collect();
                PipelineError::Unexpected(format!(
                    "Predicted label ID {} not in id2label. Available: {}",
                    pred_id,
                    available.join(", ")
                ))
            })
    }
}

impl SentimentAnalysisModel for DistilBertSentimentModel {
    type Options = DistilBertOptions;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        DistilBertSentimentModel::new(options, device)
    }

    fn predict_with_score(&self, tokenizer: &Tokenizer, text: &str) -> Result<SentimentResult> {
        let tokens = tokenizer.encode(text, true).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Tokenization failed on '{}': {}",
                &text.chars().take(50).collect::<String>(),
                e
            ))
        })?;

        let input_ids = Tensor::new(tokens.get_ids(), &self.device)?.unsqueeze(0)?;
        let logits = self.logits(&input_ids)?;

        let pred_id = logits.argmax(D::Minus1)?.squeeze(0)?.to_scalar::<u32>()?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;
        let score = probs.get(pred_id as usize).copied().unwrap_or(0.0);

        Ok(SentimentResult {
            label: self.label_for(pred_id)?,
            score,
            input_tokens: tokens.get_ids().len(),
        })
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        TokenizerLoader::new(&options.tokenizer_repo)
            .with_max_length(MAX_INPUT_TOKENS)
            .load()
    }

    fn device(&self) -> &Device {
        &self.device
    }
}
