pub mod sentiment;
pub mod stats;
pub mod text_generation;
pub mod utils;
