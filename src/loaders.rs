use std::path::PathBuf;
use std::time::Duration;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::api::sync::{ApiBuilder, ApiError};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

const LOCK_RETRIES: u32 = 3;

/// A single file in a Hugging Face Hub model repo.
#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    /// Download the file (or reuse the local hub cache) and return its path.
    pub fn load(&self) -> Result<PathBuf> {
        let hf_api = ApiBuilder::new().with_progress(false).build().map_err(|e| {
            PipelineError::Download(format!("Failed to initialize HuggingFace API: {e}"))
        })?;
        let hf_repo = hf_api.model(self.repo.clone());

        let mut attempt = 0;
        loop {
            match hf_repo.get(self.filename.as_str()) {
                Ok(path) => {
                    debug!(repo = %self.repo, file = %self.filename, "resolved hub file");
                    return Ok(path);
                }
                // Another process holds the hub cache lock.
                Err(e) if is_lock_contention(&e) && attempt + 1 < LOCK_RETRIES => {
                    warn!(repo = %self.repo, file = %self.filename, attempt, "hub cache locked, retrying");
                    std::thread::sleep(Duration::from_millis(100 << attempt));
                    attempt += 1;
                }
                Err(e) => {
                    return Err(PipelineError::Download(format!(
                        "Failed to download '{}' from '{}': {}",
                        self.filename, self.repo, e
                    )));
                }
            }
        }
    }
}

fn is_lock_contention(e: &ApiError) -> bool {
    matches!(e, ApiError::LockAcquisition(_))
}

/// Loads `tokenizer.json`, optionally truncating encodings to `max_length` tokens.
#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
    pub max_length: Option<usize>,
}

impl TokenizerLoader {
    pub fn new(repo: &str) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, "tokenizer.json"),
            max_length: None,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let tokenizer_file_path = self.tokenizer_file_loader.load()?;
        let path_str = tokenizer_file_path.display().to_string();

        let mut tokenizer = Tokenizer::from_file(&tokenizer_file_path).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Failed to load tokenizer from '{}': {}",
                path_str, e
            ))
        })?;

        if let Some(max_length) = self.max_length {
            tokenizer
                .with_truncation(Some(TruncationParams {
                    max_length,
                    ..Default::default()
                }))
                .map_err(|e| {
                    PipelineError::Tokenization(format!(
                        "Failed to set truncation on '{}': {}",
                        path_str, e
                    ))
                })?;
        }

        Ok(tokenizer)
    }
}

/// Loads `config.json` and the weights of a full-precision model repo.
#[derive(Debug, Clone)]
pub struct WeightsLoader {
    pub repo: String,
}

impl WeightsLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    /// Raw `config.json` contents. Callers deserialize the parts they need.
    pub fn load_config(&self) -> Result<String> {
        let config_path = HfLoader::new(&self.repo, "config.json").load()?;
        Ok(std::fs::read_to_string(config_path)?)
    }

    /// Prefers `model.safetensors`, falls back to `pytorch_model.bin`.
    pub fn load_weights(&self, device: &Device) -> Result<VarBuilder<'static>> {
        let weights_path = HfLoader::new(&self.repo, "model.safetensors")
            .load()
            .or_else(|_| HfLoader::new(&self.repo, "pytorch_model.bin").load())?;

        let vb = if weights_path.extension().is_some_and(|e| e == "safetensors") {
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? }
        } else {
            VarBuilder::from_pth(&weights_path, DType::F32, device)?
        };

        Ok(vb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_lock_errors_are_retried() {
        assert!(is_lock_contention(&ApiError::LockAcquisition(PathBuf::from(
            "models--google--flan-t5-small/blobs/x.lock"
        ))));
        assert!(!is_lock_contention(&ApiError::InvalidResume));
        assert!(!is_lock_contention(&ApiError::IoError(std::io::Error::other("disk full"))));
    }
}
