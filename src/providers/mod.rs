//! Generative-text provider implementations

pub mod gemini;
pub mod perplexity;

// Re-export for convenience
pub use gemini::GeminiClient;
pub use perplexity::PerplexityClient;
