//! Request and outcome types shared by the providers

/// Placeholder a topic is substituted into
pub const TOPIC_PLACEHOLDER: &str = "{topic}";

pub const DEFAULT_TOPIC_TEMPLATE: &str
  = "Analyze this trending Reddit topic and explain why it might be popular: {topic}";

/// Outcome of one generation call.
/// `Empty` is a valid answer, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult
{   /// First candidate's text
    Text(String)
  , /// Backend returned nothing usable
    Empty
  , /// The call itself failed
    Failure(crate::error::Error)
}

impl AnalysisResult
{   pub fn text(&self) -> Option<&str>
    {   match self
        {   AnalysisResult::Text(text) => Some(text.as_str())
          , _ => None
        }
    }

    pub fn is_text(&self) -> bool
    {   matches!(self, AnalysisResult::Text(_))
    }

    pub fn is_empty(&self) -> bool
    {   matches!(self, AnalysisResult::Empty)
    }

    pub fn is_failure(&self) -> bool
    {   matches!(self, AnalysisResult::Failure(_))
    }
}

/// Prompt with a `{topic}` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate
{   template: String
}

impl PromptTemplate
{   /// Rejects templates that have nowhere to put the topic
    pub fn new(template: impl Into<String>)
      -> crate::error::Result<Self>
    {   let template = template.into();
        if !template.contains(TOPIC_PLACEHOLDER)
        {   return Err(crate::error::Error::InvalidConfiguration(
              format!(
                "prompt template must contain {}",
                TOPIC_PLACEHOLDER
              )
            ));
        }
        Ok(PromptTemplate { template })
    }

    pub fn render(&self, topic: &str) -> String
    {   self.template.replace(TOPIC_PLACEHOLDER, topic)
    }
}

impl Default for PromptTemplate
{   fn default() -> Self
    {   PromptTemplate
        {   template: DEFAULT_TOPIC_TEMPLATE.to_string()
        }
    }
}

/// Ordered topic -> result mapping produced by a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchAnalysis
{   entries: Vec<(String, AnalysisResult)>
}

impl BatchAnalysis
{   pub fn new() -> Self
    {   BatchAnalysis::default()
    }

    /// A repeated topic keeps its first position, latest result
    pub fn insert(&mut self, topic: String, result: AnalysisResult)
    {   match self.entries.iter_mut().find(|(t, _)| *t == topic)
        {   Some(entry) => entry.1 = result
          , None => self.entries.push((topic, result))
        }
    }

    pub fn get(&self, topic: &str) -> Option<&AnalysisResult>
    {   self.entries.iter()
          .find(|(t, _)| t == topic)
          .map(|(_, r)| r)
    }

    pub fn len(&self) -> usize
    {   self.entries.len()
    }

    pub fn is_empty(&self) -> bool
    {   self.entries.is_empty()
    }

    pub fn topics(&self) -> impl Iterator<Item = &str>
    {   self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self)
      -> impl Iterator<Item = (&str, &AnalysisResult)>
    {   self.entries.iter().map(|(t, r)| (t.as_str(), r))
    }

    pub fn failures(&self) -> usize
    {   self.entries.iter().filter(|(_, r)| r.is_failure()).count()
    }
}

impl IntoIterator for BatchAnalysis
{   type Item = (String, AnalysisResult);
    type IntoIter = std::vec::IntoIter<(String, AnalysisResult)>;

    fn into_iter(self) -> Self::IntoIter
    {   self.entries.into_iter()
    }
}

/// Answer from a retrieval-backed provider
#[derive(Debug, Clone, PartialEq)]
pub struct CitedAnswer
{   pub result: AnalysisResult
  , /// Source URLs in the order the backend listed them
    pub citations: Vec<String>
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn test_default_template_substitutes_once()
    {   let prompt = PromptTemplate::default().render("Rust 2024");
        assert_eq!(prompt.matches("Rust 2024").count(), 1);
        assert!(!prompt.contains(TOPIC_PLACEHOLDER));
        assert!(prompt.ends_with(": Rust 2024"));
    }

    #[test]
    fn test_template_without_placeholder_rejected()
    {   let result = PromptTemplate::new("Tell me a story");
        assert!(matches!(
          result,
          Err(crate::error::Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_batch_keeps_first_position()
    {   let mut batch = BatchAnalysis::new();
        batch.insert("a".to_string(), AnalysisResult::Empty);
        batch.insert("b".to_string(), AnalysisResult::Empty);
        batch.insert(
          "a".to_string(),
          AnalysisResult::Text("again".to_string())
        );

        let topics: Vec<&str> = batch.topics().collect();
        assert_eq!(topics, vec!["a", "b"]);
        assert_eq!(batch.get("a").and_then(|r| r.text()), Some("again"));
    }
}
