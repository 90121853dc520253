use crate::error::Result;
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// An encoder-decoder model that turns an instruction into new text.
///
/// The pipeline drives the sampling loop; the model only runs forward passes.
pub trait TextGenerationModel {
    type Options: std::fmt::Debug + Clone;

    fn new(options: Self::Options, device: Device) -> Result<Self>
    where
        Self: Sized;

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    /// Run the encoder once over the prompt tokens, shape `(1, seq)`.
    fn encode(&mut self, input_ids: &Tensor) -> Result<Tensor>;

    /// Logits for the next token, shape `(1, vocab)`.
    ///
    /// With [`uses_cache`](Self::uses_cache) only the newest token is passed after
    /// the first step; otherwise the whole decoder sequence is passed each time.
    fn decode(&mut self, decoder_input_ids: &Tensor, encoder_output: &Tensor) -> Result<Tensor>;

    fn decoder_start_token(&self) -> u32;

    fn eos_token(&self) -> u32;

    fn uses_cache(&self) -> bool;

    /// Drop any KV cache left by the previous call.
    fn clear_cache(&mut self);
}
