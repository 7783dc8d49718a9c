//! HTTP transport seam shared by the provider clients

use std::time::Duration;
use async_trait::async_trait;
use log::{error, trace};

/// One JSON POST as the providers describe it
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest
{   pub url: String
  , pub headers: Vec<(String, String)>
  , pub body: serde_json::Value
}

impl HttpRequest
{   /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str>
    {   self.headers.iter()
          .find(|(k, _)| k.eq_ignore_ascii_case(name))
          .map(|(_, v)| v.as_str())
    }
}

/// Status plus raw body of any received response
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse
{   pub status: u16
  , pub body: String
}

impl HttpResponse
{   pub fn is_success(&self) -> bool
    {   (200..300).contains(&self.status)
    }
}

/// Performs a single POST. Connection failures and timeouts are
/// `Err`; every response that arrives, 2xx or not, is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync
{   async fn post_json(&self, request: HttpRequest)
      -> crate::error::Result<HttpResponse>;
}

/// Production transport over `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport
{   http_client: reqwest::Client
}

impl ReqwestTransport
{   pub fn new(timeout_secs: Option<u64>)
      -> crate::error::Result<Self>
    {   let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs
        {   builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build().map_err(|e| {
          error!("Failed to build HTTP client: {}", e);
          crate::error::Error::InvalidConfiguration(
            format!("HTTP client: {}", e)
          )
        })?;
        Ok(ReqwestTransport { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport
{   async fn post_json(&self, request: HttpRequest)
      -> crate::error::Result<HttpResponse>
    {   let mut builder = self.http_client.post(&request.url);
        for (name, value) in &request.headers
        {   builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
          .json(&request.body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            crate::error::Error::from_reqwest(&e)
          })?;

        let status = response.status().as_u16();
        trace!("Response status: {}", status);

        let body = response.text().await.map_err(|e| {
          error!("Failed to read response body: {}", e);
          crate::error::Error::from_reqwest(&e)
        })?;

        Ok(HttpResponse { status, body })
    }
}
