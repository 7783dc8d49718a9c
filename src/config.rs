//! Configuration for the generative-text clients

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use log::{debug, trace};

pub const GEMINI_API_BASE: &str
  = "https://generativelanguage.googleapis.com/v1beta";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const PERPLEXITY_API_BASE: &str = "https://api.perplexity.ai";
pub const PERPLEXITY_DEFAULT_MODEL: &str = "sonar-pro";
pub const PERPLEXITY_SYSTEM_MESSAGE: &str
  = "You are a helpful assistant that always cites sources.";

/// Default secrets file consulted after the process environment
pub const DEFAULT_SECRETS_FILE: &str = ".env";

// ===== Generation Config =====

/// Sampling options sent as `generationConfig`.
/// Every field is optional; `None` means "not set here".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig
{   #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>
}

impl GenerationConfig
{   /// Fixed defaults used for topic analysis
    pub fn topic_defaults() -> Self
    {   GenerationConfig
        {   temperature: Some(1.0)
          , top_p: Some(0.8)
          , top_k: Some(10)
          , stop_sequences: Some(vec!["Title".to_string()])
          , max_output_tokens: None
          , candidate_count: None
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self
    {   self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self
    {   self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self
    {   self.top_k = Some(top_k);
        self
    }

    pub fn with_stop_sequences(mut self, stops: Vec<String>) -> Self
    {   self.stop_sequences = Some(stops);
        self
    }

    /// Layer `self` over `defaults`: a key set here wins,
    /// an unset key falls back to the default. Shallow, per key.
    pub fn merged_onto(
      &self
    , defaults: &GenerationConfig
    ) -> GenerationConfig
    {   GenerationConfig
        {   temperature: self.temperature.or(defaults.temperature)
          , top_p: self.top_p.or(defaults.top_p)
          , top_k: self.top_k.or(defaults.top_k)
          , stop_sequences: self.stop_sequences.clone()
              .or_else(|| defaults.stop_sequences.clone())
          , max_output_tokens: self.max_output_tokens
              .or(defaults.max_output_tokens)
          , candidate_count: self.candidate_count
              .or(defaults.candidate_count)
        }
    }
}

// ===== Credentials =====

/// Where an API key is looked up: the process environment first,
/// then an optional `.env` style secrets file.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialSource
{   pub env_var: String
  , pub secrets_file: Option<PathBuf>
}

impl CredentialSource
{   pub fn new(env_var: impl Into<String>) -> Self
    {   CredentialSource
        {   env_var: env_var.into()
          , secrets_file: Some(PathBuf::from(DEFAULT_SECRETS_FILE))
        }
    }

    /// Default source for a provider's key
    pub fn for_provider(provider: &crate::Provider) -> Self
    {   CredentialSource::new(provider.api_key_var())
    }

    pub fn with_secrets_file(mut self, path: impl Into<PathBuf>) -> Self
    {   self.secrets_file = Some(path.into());
        self
    }

    pub fn without_secrets_file(mut self) -> Self
    {   self.secrets_file = None;
        self
    }

    /// Resolve the key. Empty values count as absent.
    pub fn resolve(&self) -> crate::error::Result<String>
    {   if let Ok(key) = std::env::var(&self.env_var)
        {   if !key.trim().is_empty()
            {   debug!("Using {} from environment", self.env_var);
                return Ok(key);
            }
        }

        if let Some(path) = &self.secrets_file
        {   if let Some(key) = read_secret(path, &self.env_var)?
            {   debug!(
                  "Using {} from {}",
                  self.env_var,
                  path.display()
                );
                return Ok(key);
            }
        }

        Err(crate::error::Error::MissingCredential(
          self.env_var.clone()
        ))
    }
}

/// Look `name` up in a dotenv file without touching the process
/// environment. A missing file is not an error.
fn read_secret(path: &Path, name: &str)
  -> crate::error::Result<Option<String>>
{   let iter = match dotenvy::from_path_iter(path)
    {   Ok(iter) => iter
      , Err(e) if e.not_found() => {
          trace!("No secrets file at {}", path.display());
          return Ok(None);
        }
      , Err(e) => {
          return Err(crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          ));
        }
    };

    for item in iter
    {   let (key, value) = item.map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })?;
        if key == name && !value.trim().is_empty()
        {   return Ok(Some(value));
        }
    }
    Ok(None)
}

// ===== Provider Configs =====

/// Gemini client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig
{   /// API key, never serialized
    #[serde(skip_serializing, default)]
    pub api_key: String
  , /// API base URL
    pub api_base: String
  , /// Model name used in the endpoint path
    pub model: String
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
  , /// Defaults that per-call overrides are merged onto
    pub generation: GenerationConfig
}

impl GeminiConfig
{   pub fn new(api_key: impl Into<String>) -> Self
    {   GeminiConfig
        {   api_key: api_key.into()
          , api_base: GEMINI_API_BASE.to_string()
          , model: GEMINI_DEFAULT_MODEL.to_string()
          , timeout_secs: None
          , generation: GenerationConfig::topic_defaults()
        }
    }

    /// Build from a credential source, failing on a missing key
    pub fn from_credentials(source: &CredentialSource)
      -> crate::error::Result<Self>
    {   Ok(GeminiConfig::new(source.resolve()?))
    }

    /// Build from `GEMINI_API_KEY` in the environment or `.env`
    pub fn from_env() -> crate::error::Result<Self>
    {   GeminiConfig::from_credentials(
          &CredentialSource::for_provider(&crate::Provider::Google)
        )
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self
    {   self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self
    {   self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self
    {   self.timeout_secs = Some(secs);
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self
    {   self.generation = generation;
        self
    }

    /// Full `generateContent` endpoint
    pub fn endpoint(&self) -> String
    {   format!(
          "{}/models/{}:generateContent",
          self.api_base.trim_end_matches('/'),
          self.model
        )
    }
}

/// Perplexity client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerplexityConfig
{   /// API key, never serialized
    #[serde(skip_serializing, default)]
    pub api_key: String
  , /// API base URL
    pub api_base: String
  , /// Model name
    pub model: String
  , /// System message sent ahead of every prompt
    pub system_message: Option<String>
  , /// Max tokens to generate
    pub max_tokens: Option<usize>
  , /// Temperature for sampling
    pub temperature: Option<f64>
  , /// Request timeout in seconds
    pub timeout_secs: Option<u64>
}

impl PerplexityConfig
{   pub fn new(api_key: impl Into<String>) -> Self
    {   PerplexityConfig
        {   api_key: api_key.into()
          , api_base: PERPLEXITY_API_BASE.to_string()
          , model: PERPLEXITY_DEFAULT_MODEL.to_string()
          , system_message: Some(PERPLEXITY_SYSTEM_MESSAGE.to_string())
          , max_tokens: Some(512)
          , temperature: Some(0.2)
          , timeout_secs: None
        }
    }

    pub fn from_credentials(source: &CredentialSource)
      -> crate::error::Result<Self>
    {   Ok(PerplexityConfig::new(source.resolve()?))
    }

    /// Build from `SONAR_API_KEY` in the environment or `.env`
    pub fn from_env() -> crate::error::Result<Self>
    {   PerplexityConfig::from_credentials(
          &CredentialSource::for_provider(&crate::Provider::PerplexityAi)
        )
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self
    {   self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self
    {   self.model = model.into();
        self
    }

    pub fn with_system_message(mut self, system: Option<String>) -> Self
    {   self.system_message = system;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self
    {   self.timeout_secs = Some(secs);
        self
    }

    /// Full chat completions endpoint
    pub fn endpoint(&self) -> String
    {   format!(
          "{}/chat/completions",
          self.api_base.trim_end_matches('/')
        )
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn test_override_shadows_per_key()
    {   let defaults = GenerationConfig::topic_defaults();
        let overrides = GenerationConfig::default()
          .with_temperature(0.3);
        let merged = overrides.merged_onto(&defaults);

        assert_eq!(merged.temperature, Some(0.3));
        assert_eq!(merged.top_p, Some(0.8));
        assert_eq!(merged.top_k, Some(10));
        assert_eq!(
          merged.stop_sequences,
          Some(vec!["Title".to_string()])
        );
    }

    #[test]
    fn test_empty_override_keeps_defaults()
    {   let defaults = GenerationConfig::topic_defaults();
        let merged = GenerationConfig::default().merged_onto(&defaults);
        assert_eq!(merged, defaults);
    }

    #[test]
    fn test_generation_config_wire_names()
    {   let value = serde_json::to_value(
          GenerationConfig::topic_defaults()
        ).unwrap();
        assert_eq!(value["temperature"], 1.0);
        assert_eq!(value["topK"], 10);
        assert_eq!(value["stopSequences"][0], "Title");
        assert_eq!(value["topP"], 0.8);
        assert!(value.get("maxOutputTokens").is_none());
    }

    #[test]
    fn test_gemini_endpoint()
    {   let config = GeminiConfig::new("k")
          .with_api_base("http://localhost:9000/");
        assert_eq!(
          config.endpoint(),
          "http://localhost:9000/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_secrets_file_lookup()
    {   let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.env");
        std::fs::write(
          &path,
          "OTHER=1\nTOPICGEN_TEST_FILE_ONLY_KEY=from-file\n"
        ).unwrap();

        let source = CredentialSource::new("TOPICGEN_TEST_FILE_ONLY_KEY")
          .with_secrets_file(&path);
        assert_eq!(source.resolve().unwrap(), "from-file");
    }

    #[test]
    fn test_without_secrets_file_skips_file()
    {   let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.env");
        std::fs::write(&path, "TOPICGEN_TEST_SKIPPED_KEY=from-file\n")
          .unwrap();

        let source = CredentialSource::new("TOPICGEN_TEST_SKIPPED_KEY")
          .with_secrets_file(&path)
          .without_secrets_file();
        assert!(source.secrets_file.is_none());
        assert!(source.resolve().is_err());
    }

    #[test]
    fn test_missing_credential()
    {   let dir = tempfile::tempdir().unwrap();
        let source = CredentialSource::new("TOPICGEN_TEST_NEVER_SET")
          .with_secrets_file(dir.path().join("absent.env"));
        assert_eq!(
          source.resolve(),
          Err(crate::error::Error::MissingCredential(
            "TOPICGEN_TEST_NEVER_SET".to_string()
          ))
        );
    }
}
