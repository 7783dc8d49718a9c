use serde::{Deserialize, Serialize};
use log::{debug, trace, error};

use crate::config::PerplexityConfig;
use crate::request::{AnalysisResult, CitedAnswer};
use crate::transport::{
  HttpRequest
, HttpResponse
, ReqwestTransport
, Transport
};

// ===== Message Types =====

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>
  , #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>
  , pub stream: bool
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   #[serde(default)]
    pub choices: Vec<Choice>
  , #[serde(default)]
    pub citations: Option<Vec<String>>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   #[serde(default)]
    pub message: Option<ResponseMessage>
  , #[serde(default)]
    pub finish_reason: Option<String>
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub content: Option<String>
}

/// Normalize a chat completion response
pub fn parse_response(response: &HttpResponse) -> CitedAnswer
{   let failed = |e: crate::error::Error| CitedAnswer
    {   result: AnalysisResult::Failure(e)
      , citations: vec![]
    };

    if !response.is_success()
    {   error!(
          "Perplexity API error {}: {}",
          response.status,
          response.body
        );
        return failed(crate::error::Error::ApiError
        {   status: response.status
          , message: response.body.clone()
        });
    }

    let value: serde_json::Value = match serde_json::from_str(&response.body)
    {   Ok(value) => value
      , Err(e) => {
          error!("Parse error: {}", e);
          return failed(e.into());
        }
    };

    let parsed: ChatResponse = match serde_json::from_value(value)
    {   Ok(parsed) => parsed
      , Err(e) => {
          debug!("Unexpected response shape: {}", e);
          return CitedAnswer
          {   result: AnalysisResult::Empty
            , citations: vec![]
          };
        }
    };

    let text = parsed.choices.first()
      .and_then(|c| c.message.as_ref())
      .and_then(|m| m.content.clone());

    let citations = parsed.citations.unwrap_or_default();
    debug!("Received {} citations", citations.len());

    CitedAnswer
    {   result: match text
        {   Some(text) => AnalysisResult::Text(text)
          , None => {
              debug!(
                "No answer text ({} choices, finish reason: {:?})",
                parsed.choices.len(),
                parsed.choices.first()
                  .and_then(|c| c.finish_reason.as_deref())
              );
              AnalysisResult::Empty
            }
        }
      , citations
    }
}

// ===== Perplexity Client =====

/// Perplexity chat completions client
pub struct PerplexityClient<T = ReqwestTransport>
{   config: PerplexityConfig
  , transport: T
}

impl PerplexityClient<ReqwestTransport>
{   pub fn new(config: PerplexityConfig)
      -> crate::error::Result<Self>
    {   let transport = ReqwestTransport::new(config.timeout_secs)?;
        PerplexityClient::with_transport(config, transport)
    }

    /// Create a client keyed from `SONAR_API_KEY`
    pub fn from_env() -> crate::error::Result<Self>
    {   PerplexityClient::new(PerplexityConfig::from_env()?)
    }
}

impl<T: Transport> PerplexityClient<T>
{   pub fn with_transport(config: PerplexityConfig, transport: T)
      -> crate::error::Result<Self>
    {   validate(&config)?;
        debug!(
          "Creating PerplexityClient for model: {}",
          config.model
        );
        Ok(PerplexityClient { config, transport })
    }

    pub fn config(&self) -> &PerplexityConfig
    {   &self.config
    }

    fn build_request(&self, prompt: &str) -> ChatRequest
    {   let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.config.system_message
        {   messages.push(ChatMessage
            {   role: "system".to_string()
              , content: system.clone()
            });
        }
        messages.push(ChatMessage
        {   role: "user".to_string()
          , content: prompt.to_string()
        });

        ChatRequest
        {   model: self.config.model.clone()
          , messages
          , max_tokens: self.config.max_tokens
          , temperature: self.config.temperature
          , stream: false
        }
    }

    /// Ask one question; text and citations come back together
    pub async fn ask(&self, prompt: &str) -> CitedAnswer
    {   debug!("Handling ask for: {}", self.config.model);
        let request = self.build_request(prompt);
        trace!("Perplexity request: {:?}", request);

        let body = match serde_json::to_value(&request)
        {   Ok(body) => body
          , Err(e) => return CitedAnswer
            {   result: AnalysisResult::Failure(e.into())
              , citations: vec![]
            }
        };

        let http_request = HttpRequest
        {   url: self.config.endpoint()
          , headers: vec![
              (
                "Authorization".to_string(),
                format!("Bearer {}", self.config.api_key)
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
              trace!(
                "Perplexity response status: {}",
                response.status
              );
              parse_response(&response)
            }
          , Err(e) => {
              error!("Perplexity request failed: {}", e);
              CitedAnswer
              {   result: AnalysisResult::Failure(e)
                , citations: vec![]
              }
            }
        }
    }
}

fn validate(config: &PerplexityConfig) -> crate::error::Result<()>
{   if config.api_key.trim().is_empty()
    {   error!("No Perplexity API key");
        return Err(crate::error::Error::MissingCredential(
          crate::Provider::PerplexityAi.api_key_var().to_string()
        ));
    }
    if config.api_base.is_empty() || config.model.is_empty()
    {   return Err(crate::error::Error::InvalidConfiguration(
          "Perplexity base URL and model must be set".to_string()
        ));
    }
    Ok(())
}
