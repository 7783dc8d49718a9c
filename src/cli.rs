//! Command line definition for the `topicgen` binary

use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};

pub const DEFAULT_TOPIC: &str = "Artificial Intelligence";

/// Analyze trending topics or ask a cited question
#[derive(Debug, Parser)]
#[command(name = "topicgen", version, about)]
pub struct Cli
{   #[command(subcommand)]
    pub command: Commands
}

#[derive(Debug, Subcommand)]
pub enum Commands
{   /// Analyze topics with Gemini, one call per topic
    Analyze(AnalyzeArgs)
  , /// Ask Perplexity a question and list its citations
    Ask(AskArgs)
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs
{   /// Topics to analyze, in order
    #[arg(default_value = DEFAULT_TOPIC)]
    pub topics: Vec<String>
  , /// Also write every analysis to this markdown file
    #[arg(long, env = "TOPICGEN_REPORT")]
    pub report: Option<PathBuf>
}

#[derive(Debug, Args, Clone)]
pub struct AskArgs
{   /// Question sent as the user message
    pub prompt: String
  , /// Also write the answer and citations to this markdown file
    #[arg(long, env = "TOPICGEN_REPORT")]
    pub report: Option<PathBuf>
}

#[cfg(test)]
mod tests
{   use super::*;
    use clap::Parser;
    use clap::error::ErrorKind;

    #[test]
    fn test_analyze_defaults_to_one_topic()
    {   let cli = Cli::parse_from(["topicgen", "analyze"]);
        match cli.command
        {   Commands::Analyze(args) => {
              assert_eq!(args.topics, vec![DEFAULT_TOPIC.to_string()]);
            }
          , _ => panic!("expected analyze command")
        }
    }

    #[test]
    fn test_analyze_keeps_topic_order()
    {   let cli = Cli::parse_from([
          "topicgen", "analyze", "rust", "go", "--report", "out.md"
        ]);
        match cli.command
        {   Commands::Analyze(args) => {
              assert_eq!(args.topics, vec!["rust", "go"]);
              assert_eq!(args.report, Some(PathBuf::from("out.md")));
            }
          , _ => panic!("expected analyze command")
        }
    }

    #[test]
    fn test_help_flag_is_not_a_topic()
    {   let err = Cli::try_parse_from(["topicgen", "analyze", "--help"])
          .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = Cli::try_parse_from(["topicgen", "--version"])
          .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_ask_requires_prompt()
    {   let cli = Cli::parse_from(["topicgen", "ask", "What is Sonar?"]);
        match cli.command
        {   Commands::Ask(args) => {
              assert_eq!(args.prompt, "What is Sonar?")
            }
          , _ => panic!("expected ask command")
        }
        assert!(Cli::try_parse_from(["topicgen", "ask"]).is_err());
    }
}
