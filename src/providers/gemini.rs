use serde::{Deserialize, Serialize};
use log::{debug, trace, error, info};

use crate::config::{GeminiConfig, GenerationConfig};
use crate::request::{AnalysisResult, BatchAnalysis, PromptTemplate};
use crate::transport::{
  HttpRequest
, HttpResponse
, ReqwestTransport
, Transport
};

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part
{   #[serde(default)]
    pub text: Option<String>
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content
{   #[serde(default)]
    pub parts: Vec<Part>
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest
{   pub contents: Vec<Content>
  , pub generation_config: GenerationConfig
}

impl GenerateContentRequest
{   pub fn new(prompt: &str, generation_config: GenerationConfig)
      -> Self
    {   GenerateContentRequest
        {   contents: vec![
              Content
              {   parts: vec![
                    Part { text: Some(prompt.to_string()) }
                  ]
              }
            ]
          , generation_config
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse
{   #[serde(default)]
    pub candidates: Vec<Candidate>
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate
{   #[serde(default)]
    pub content: Option<Content>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

impl GenerateContentResponse
{   /// First candidate's first part, if it carries text
    pub fn first_text(&self) -> Option<&str>
    {   self.candidates.first()?
          .content.as_ref()?
          .parts.first()?
          .text.as_deref()
    }
}

/// Normalize a raw response into an outcome.
/// Undecodable bodies fail; unexpected shapes are `Empty`.
pub fn parse_response(response: &HttpResponse) -> AnalysisResult
{   if !response.is_success()
    {   error!(
          "Gemini API error {}: {}",
          response.status,
          response.body
        );
        return AnalysisResult::Failure(
          crate::error::Error::ApiError
          {   status: response.status
            , message: response.body.clone()
          }
        );
    }

    let value: serde_json::Value
      = match serde_json::from_str(&response.body)
    {   Ok(value) => value
      , Err(e) => {
          error!("Parse error: {}", e);
          return AnalysisResult::Failure(e.into());
        }
    };

    let parsed: GenerateContentResponse
      = match serde_json::from_value(value)
    {   Ok(parsed) => parsed
      , Err(e) => {
          debug!("Unexpected response shape: {}", e);
          return AnalysisResult::Empty;
        }
    };

    match parsed.first_text()
    {   Some(text) => AnalysisResult::Text(text.to_string())
      , None => {
          debug!(
            "No usable candidate ({} returned, finish reason: {:?})",
            parsed.candidates.len(),
            parsed.candidates.first()
              .and_then(|c| c.finish_reason.as_deref())
          );
          AnalysisResult::Empty
        }
    }
}

// ===== Gemini Client =====

/// Gemini `generateContent` client. Holds only immutable
/// configuration, so one instance can be shared across tasks.
pub struct GeminiClient<T = ReqwestTransport>
{   config: GeminiConfig
  , transport: T
}

impl GeminiClient<ReqwestTransport>
{   /// Create a client over HTTP.
    /// Fails before any request when the key is missing.
    pub fn new(config: GeminiConfig)
      -> crate::error::Result<Self>
    {   let transport = ReqwestTransport::new(config.timeout_secs)?;
        GeminiClient::with_transport(config, transport)
    }

    /// Create a client keyed from `GEMINI_API_KEY`
    pub fn from_env() -> crate::error::Result<Self>
    {   GeminiClient::new(GeminiConfig::from_env()?)
    }
}

impl<T: Transport> GeminiClient<T>
{   pub fn with_transport(config: GeminiConfig, transport: T)
      -> crate::error::Result<Self>
    {   validate(&config)?;
        debug!(
          "Creating GeminiClient for model: {}",
          config.model
        );
        Ok(GeminiClient { config, transport })
    }

    pub fn config(&self) -> &GeminiConfig
    {   &self.config
    }

    /// Analyze one topic with `template` or the default template
    pub async fn analyze(
      &self
    , topic: &str
    , template: Option<&PromptTemplate>
    ) -> AnalysisResult
    {   let prompt = match template
        {   Some(template) => template.render(topic)
          , None => PromptTemplate::default().render(topic)
        };
        debug!("Analyzing topic: {}", topic);
        self.generate(&prompt, &GenerationConfig::default()).await
    }

    /// Send `prompt` with `overrides` merged onto the defaults
    pub async fn generate(
      &self
    , prompt: &str
    , overrides: &GenerationConfig
    ) -> AnalysisResult
    {   let generation_config
          = overrides.merged_onto(&self.config.generation);
        let request
          = GenerateContentRequest::new(prompt, generation_config);

        trace!("Gemini request: {:?}", request);

        let body = match serde_json::to_value(&request)
        {   Ok(body) => body
          , Err(e) => return AnalysisResult::Failure(e.into())
        };

        let http_request = HttpRequest
        {   url: self.config.endpoint()
          , headers: vec![
              (
                "x-goog-api-key".to_string(),
                self.config.api_key.clone()
              )
            , (
                "Content-Type".to_string(),
                "application/json".to_string()
              )
            ]
          , body
        };

        match self.transport.post_json(http_request).await
        {   Ok(response) => {
              trace!("Gemini response status: {}", response.status);
              parse_response(&response)
            }
          , Err(e) => {
              error!("Gemini request failed: {}", e);
              AnalysisResult::Failure(e)
            }
        }
    }

    /// Analyze each topic in order, one call at a time.
    /// A failing topic is recorded and the loop continues.
    pub async fn analyze_many<S: AsRef<str>>(
      &self
    , topics: &[S]
    , template: Option<&PromptTemplate>
    ) -> BatchAnalysis
    {   info!("Analyzing {} topics", topics.len());
        let mut batch = BatchAnalysis::new();
        for topic in topics
        {   let topic = topic.as_ref();
            let result = self.analyze(topic, template).await;
            match &result
            {   AnalysisResult::Text(_) => {
                  debug!("Analysis ready for: {}", topic)
                }
              , AnalysisResult::Empty => {
                  debug!("No analysis for: {}", topic)
                }
              , AnalysisResult::Failure(e) => {
                  error!("Analysis failed for {}: {}", topic, e)
                }
            }
            batch.insert(topic.to_string(), result);
        }
        batch
    }
}

fn validate(config: &GeminiConfig) -> crate::error::Result<()>
{   if config.api_key.trim().is_empty()
    {   error!("No Gemini API key");
        return Err(crate::error::Error::MissingCredential(
          crate::Provider::Google.api_key_var().to_string()
        ));
    }
    if config.api_base.is_empty() || config.model.is_empty()
    {   return Err(crate::error::Error::InvalidConfiguration(
          "Gemini base URL and model must be set".to_string()
        ));
    }
    Ok(())
}
