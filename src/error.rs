use std::fmt;

/// Custom error type for topicgen operations
/// Implements Clone so a failure can be stored per batch entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// No API key in the environment or secrets file
    MissingCredential(String)
  , /// Connection or transport level failure
    HttpError(String)
  , /// Backend answered with a non-success status
    ApiError
    {   status: u16
      , message: String
    }
  , /// Response body could not be decoded
    ParseError(String)
  , /// Invalid configuration (template, client setup)
    InvalidConfiguration(String)
  , /// Request timed out at the HTTP layer
    Timeout
  , /// Report file could not be read or written
    Io(String)
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error
{   /// Map a reqwest failure, keeping timeouts distinct
    pub fn from_reqwest(e: &reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else
        {   Error::HttpError(e.to_string())
        }
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingCredential(var) => {
              write!(f, "Missing API key: {} is not set", var)
            }
          , Error::HttpError(msg) => {
              write!(f, "HTTP error: {}", msg)
            }
          , Error::ApiError { status, message } => {
              write!(f, "API error ({}): {}", status, message)
            }
          , Error::ParseError(msg) => {
              write!(f, "Parse error: {}", msg)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Request timed out")
            }
          , Error::Io(msg) => {
              write!(f, "I/O error: {}", msg)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error
{   fn from(e: std::io::Error) -> Self
    {   Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error
{   fn from(e: serde_json::Error) -> Self
    {   Error::ParseError(e.to_string())
    }
}
