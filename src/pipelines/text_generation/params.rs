use candle_transformers::generation::{LogitsProcessor, Sampling};

pub use candle_transformers::utils::apply_repeat_penalty;

/// Parameters controlling text generation sampling behavior.
///
/// The defaults sample with top-k 50, top-p 0.95 and temperature 0.8,
/// so repeated calls with the same prompt give different text.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    /// Randomness of sampling. 0.0 = greedy, higher = more random.
    pub temperature: f64,
    /// Only consider the top k most likely tokens.
    pub top_k: Option<usize>,
    /// Nucleus sampling: only consider tokens with cumulative probability <= p.
    pub top_p: Option<f64>,
    /// Penalty for repeating tokens. 1.0 = no penalty.
    pub repeat_penalty: f32,
    /// Number of recent tokens to consider for repeat penalty.
    pub repeat_last_n: usize,
    /// Fixed seed for reproducible output. `None` draws a fresh seed per call.
    pub seed: Option<u64>,
    /// Maximum new tokens per call when the caller does not pass one.
    pub max_len: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_k: Some(50),
            top_p: Some(0.95),
            repeat_penalty: 1.0,
            repeat_last_n: 64,
            seed: None,
            max_len: 200,
        }
    }
}

impl GenerationParams {
    pub(crate) fn sampling_strategy(&self) -> Sampling {
        if self.temperature <= 0.0 {
            return Sampling::ArgMax;
        }

        let temperature = self.temperature.max(1e-7);
        let top_k = self.top_k.unwrap_or(0);
        let top_p = self.top_p.unwrap_or(1.0);

        match (top_k > 0, top_p < 1.0) {
            (true, true) => Sampling::TopKThenTopP {
                k: top_k,
                p: top_p,
                temperature,
            },
            (true, false) => Sampling::TopK {
                k: top_k,
                temperature,
            },
            (false, true) => Sampling::TopP {
                p: top_p,
                temperature,
            },
            (false, false) => Sampling::All { temperature },
        }
    }

    pub(crate) fn logits_processor(&self) -> LogitsProcessor {
        let seed = self.seed.unwrap_or_else(rand::random);
        LogitsProcessor::from_sampling(seed, self.sampling_strategy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_sample_top_k_then_top_p() {
        let strategy = GenerationParams::default().sampling_strategy();
        assert!(matches!(
            strategy,
            Sampling::TopKThenTopP { k: 50, p, temperature }
                if (p - 0.95).abs() < f64::EPSILON && (temperature - 0.8).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn zero_temperature_is_greedy() {
        let params = GenerationParams {
            temperature: 0.0,
            ..Default::default()
        };
        assert!(matches!(params.sampling_strategy(), Sampling::ArgMax));
    }

    #[test]
    fn missing_filters_sample_everything() {
        let params = GenerationParams {
            top_k: None,
            top_p: None,
            ..Default::default()
        };
        assert!(matches!(params.sampling_strategy(), Sampling::All { .. }));

        let params = GenerationParams {
            top_k: None,
            ..Default::default()
        };
        assert!(matches!(params.sampling_strategy(), Sampling::TopP { .. }));

        let params = GenerationParams {
            top_p: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(params.sampling_strategy(), Sampling::TopK { k: 50, .. }));
    }
}
