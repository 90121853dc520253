use std::time::{Duration, Instant};

// ============ Encoder stats (classification) ============

/// Statistics for a classification run.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Total execution time.
    pub total_time: Duration,
    /// Number of tokens the classifier actually saw.
    pub input_tokens: usize,
}

impl PipelineStats {
    /// Start timing (call at start of operation).
    pub(crate) fn start() -> PipelineStatsBuilder {
        PipelineStatsBuilder {
            start_time: Instant::now(),
        }
    }
}

/// Tracks timing from creation to `finish`.
pub(crate) struct PipelineStatsBuilder {
    start_time: Instant,
}

impl PipelineStatsBuilder {
    pub fn finish(self, input_tokens: usize) -> PipelineStats {
        PipelineStats {
            total_time: self.start_time.elapsed(),
            input_tokens,
        }
    }
}

// ============ Text generation stats ============

/// Statistics for one generation call.
#[derive(Debug, Clone)]
pub struct GenerationStats {
    /// Number of tokens generated (EOS included).
    pub tokens_generated: usize,
    /// Time until the first token was sampled.
    pub time_to_first_token: Duration,
    /// Total generation time, encoder pass included.
    pub total_time: Duration,
    /// Throughput in tokens per second.
    pub tokens_per_second: f64,
    /// Number of tokens in the encoded prompt.
    pub prompt_tokens: usize,
    start_time: Instant,
    first_token_time: Option<Instant>,
}

impl GenerationStats {
    pub(crate) fn new() -> Self {
        Self {
            tokens_generated: 0,
            time_to_first_token: Duration::default(),
            total_time: Duration::default(),
            tokens_per_second: 0.0,
            prompt_tokens: 0,
            start_time: Instant::now(),
            first_token_time: None,
        }
    }

    pub(crate) fn set_prompt_tokens(&mut self, prompt_tokens: usize) {
        self.prompt_tokens = prompt_tokens;
    }

    pub(crate) fn record_token(&mut self) {
        self.tokens_generated += 1;
        if self.first_token_time.is_none() {
            let now = Instant::now();
            self.first_token_time = Some(now);
            self.time_to_first_token = now.duration_since(self.start_time);
        }
    }

    pub(crate) fn finalize(&mut self) {
        self.total_time = self.start_time.elapsed();
        self.tokens_per_second = if self.total_time.as_secs_f64() > 0.0 {
            self.tokens_generated as f64 / self.total_time.as_secs_f64()
        } else {
            0.0
        };
    }

    #[cfg(test)]
    pub(crate) fn override_times(
        &mut self,
        start_time: Instant,
        first_token_time: Option<Instant>,
    ) {
        self.start_time = start_time;
        self.first_token_time = first_token_time;
        if let Some(first) = first_token_time {
            self.time_to_first_token = first.duration_since(start_time);
        }
    }
}
