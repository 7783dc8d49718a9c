pub mod error;
pub mod config;
pub mod transport;
pub mod providers;
pub mod request;
pub mod report;
pub mod cli;
use serde::{Deserialize, Serialize};

/*

topicgen: a thin async client that sends trending topics (or any
prompt) to a generative-text backend and hands back the text.

topicgen/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports and provider list
│   ├── main.rs         # `topicgen` binary: analyze topics or ask, print
│   ├── cli.rs          # clap command line definition
│   ├── error.rs        # Error type shared by everything
│   ├── config.rs       # Generation config, credentials, provider configs
│   ├── transport.rs    # JSON POST seam + reqwest implementation
│   ├── request.rs      # Outcomes, prompt templates, batch mapping
│   ├── report.rs       # Markdown report files and console lines
│   └── providers/
│       ├── mod.rs
│       ├── gemini.rs   # generateContent: analyze / generate / analyze_many
│       └── perplexity.rs # chat completions with citations
└── tests/

Every call is awaited to completion before the next one starts;
there is no retry, caching or fan-out inside the crate.

*/

pub use config::{
  CredentialSource
, GeminiConfig
, GenerationConfig
, PerplexityConfig
};
pub use error::Error;
pub use providers::{GeminiClient, PerplexityClient};
pub use report::Report;
pub use request::{
  AnalysisResult
, BatchAnalysis
, CitedAnswer
, PromptTemplate
};

/// Backends the crate can talk to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Hash)]
pub enum Provider
{   /// Google AI Studio (Gemini)
    Google
  , /// Perplexity AI (Sonar models, cited answers)
    PerplexityAi
}

impl Provider
{   /// Environment variable holding this provider's key
    pub fn api_key_var(&self) -> &'static str
    {   match self
        {   Provider::Google => "GEMINI_API_KEY"
          , Provider::PerplexityAi => "SONAR_API_KEY"
        }
    }
}
