use clap::Parser;
use log::{error, info};

use topicgen::cli::{AnalyzeArgs, AskArgs, Cli, Commands};
use topicgen::report::{console_citations, console_line};
use topicgen::{GeminiClient, PerplexityClient, Report};

#[tokio::main]
async fn main()
{   env_logger::init();
    let cli = Cli::parse();

    match cli.command
    {   Commands::Analyze(args) => run_analyze(args).await
      , Commands::Ask(args) => run_ask(args).await
    }
}

async fn run_analyze(args: AnalyzeArgs)
{   let client = match GeminiClient::from_env()
    {   Ok(client) => client
      , Err(e) => {
          eprintln!("❌ {}", e);
          eprintln!("Please add GEMINI_API_KEY to your .env file");
          std::process::exit(1);
        }
    };

    println!("\n🤖 AI Analysis of Trending Topics:\n");
    let batch = client.analyze_many(args.topics.as_slice(), None).await;
    for (topic, result) in batch.iter()
    {   println!("{}", console_line(topic, result));
        println!("{}", "-".repeat(60));
    }

    if let Some(path) = args.report
    {   match Report::from_batch("Trending Topic Analysis", &batch)
        {   Some(report) => match report.write_to(&path)
            {   Ok(()) => info!("Report saved to {}", path.display())
              , Err(e) => error!("Could not save report: {}", e)
            }
          , None => info!("Nothing to save, no topic produced text")
        }
    }
}

async fn run_ask(args: AskArgs)
{   let client = match PerplexityClient::from_env()
    {   Ok(client) => client
      , Err(e) => {
          eprintln!("❌ {}", e);
          eprintln!("Please add SONAR_API_KEY to your .env file");
          std::process::exit(1);
        }
    };

    let answer = client.ask(&args.prompt).await;
    println!("{}", console_line(&args.prompt, &answer.result));
    if !answer.citations.is_empty()
    {   println!("{}", console_citations(&answer.citations));
    }

    if let Some(path) = args.report
    {   match Report::from_answer("Perplexity Response", &answer)
        {   Some(report) => match report.write_to(&path)
            {   Ok(()) => println!("Response also saved to {}", path.display())
              , Err(e) => error!("Could not save report: {}", e)
            }
          , None => info!("Nothing to save, no answer text")
        }
    }
}
