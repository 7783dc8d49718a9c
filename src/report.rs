//! Presentation: markdown report files and console lines.
//!
//! The report format is a heading, the body, and an optional
//! numbered citation list:
//!
//! ```text
//! # <title>
//!
//! <body>
//!
//! ## Citations
//! 1. <url>
//! 2. <url>
//! ```

use std::path::Path;
use log::debug;

use crate::request::{AnalysisResult, BatchAnalysis, CitedAnswer};

const CITATIONS_HEADING: &str = "\n\n## Citations\n";

#[derive(Debug, Clone, PartialEq)]
pub struct Report
{   pub title: String
  , pub body: String
  , pub citations: Vec<String>
}

impl Report
{   pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self
    {   Report
        {   title: title.into()
          , body: body.into()
          , citations: vec![]
        }
    }

    pub fn with_citations(mut self, citations: Vec<String>) -> Self
    {   self.citations = citations;
        self
    }

    /// Only a `Text` outcome makes a report
    pub fn from_answer(title: &str, answer: &CitedAnswer)
      -> Option<Self>
    {   answer.result.text().map(|text| {
          Report::new(title, text)
            .with_citations(answer.citations.clone())
        })
    }

    /// One section per topic that produced text, in batch order
    pub fn from_batch(title: &str, batch: &BatchAnalysis)
      -> Option<Self>
    {   let sections: Vec<String> = batch.iter()
          .filter_map(|(topic, result)| {
            result.text().map(|text| {
              format!("### {}\n\n{}", topic, text)
            })
          })
          .collect();

        if sections.is_empty()
        {   return None;
        }
        Some(Report::new(title, sections.join("\n\n")))
    }

    pub fn render(&self) -> String
    {   // The heading must stay on one line to be read back
        let title = self.title.replace('\n', " ");
        let mut out = format!("# {}\n\n{}\n\n", title, self.body);
        if !self.citations.is_empty()
        {   out.push_str(&CITATIONS_HEADING[2..]);
            for (i, url) in self.citations.iter().enumerate()
            {   out.push_str(&format!("{}. {}\n", i + 1, url));
            }
        }
        out
    }

    pub fn parse(text: &str) -> crate::error::Result<Self>
    {   let rest = text.strip_prefix("# ").ok_or_else(|| {
          crate::error::Error::ParseError(
            "report must start with a '# ' heading".to_string()
          )
        })?;

        let (title, rest) = rest.split_once("\n\n").ok_or_else(|| {
          crate::error::Error::ParseError(
            "report heading is not followed by a body".to_string()
          )
        })?;

        let (body, citations) = match rest.rfind(CITATIONS_HEADING)
        {   Some(idx) => {
              let list = &rest[idx + CITATIONS_HEADING.len()..];
              (&rest[..idx], parse_citations(list)?)
            }
          , None => {
              let body = rest.strip_suffix("\n\n").unwrap_or(rest);
              (body, vec![])
            }
        };

        Ok(Report
        {   title: title.to_string()
          , body: body.to_string()
          , citations
        })
    }

    pub fn write_to(&self, path: impl AsRef<Path>)
      -> crate::error::Result<()>
    {   let path = path.as_ref();
        debug!("Writing report to {}", path.display());
        std::fs::write(path, self.render())?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>)
      -> crate::error::Result<Self>
    {   let text = std::fs::read_to_string(path.as_ref())?;
        Report::parse(&text)
    }
}

fn parse_citations(list: &str) -> crate::error::Result<Vec<String>>
{   list.lines()
      .enumerate()
      .map(|(i, line)| {
        let prefix = format!("{}. ", i + 1);
        line.strip_prefix(prefix.as_str())
          .map(|url| url.to_string())
          .ok_or_else(|| {
            crate::error::Error::ParseError(
              format!("citation {} is malformed: {}", i + 1, line)
            )
          })
      })
      .collect()
}

/// User-facing line for one topic. Each outcome has its own marker.
pub fn console_line(topic: &str, result: &AnalysisResult) -> String
{   match result
    {   AnalysisResult::Text(text) => {
          format!("📊 Analysis for '{}':\n{}\n", topic, text)
        }
      , AnalysisResult::Empty => {
          format!("❌ No analysis available for '{}'", topic)
        }
      , AnalysisResult::Failure(e) => {
          format!("⚠️ Error analyzing '{}': {}", topic, e)
        }
    }
}

/// Citation list as printed to the console
pub fn console_citations(citations: &[String]) -> String
{   let mut out = String::from("Citations:\n");
    for (i, url) in citations.iter().enumerate()
    {   out.push_str(&format!("  {}. {}\n", i + 1, url));
    }
    out
}
