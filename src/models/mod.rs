// ============ Model implementations ============

pub(crate) mod distilbert;
pub(crate) mod flan_t5;

// Public model structs and options (for type annotations)
pub use distilbert::{
    DistilBertOptions, DistilBertSentimentModel, DEFAULT_SENTIMENT_REPO,
    DEFAULT_SENTIMENT_TOKENIZER_REPO,
};
pub use flan_t5::{FlanT5Model, FlanT5Options, FlanT5Size, DEFAULT_GENERATION_REPO};
