use tokio_test::{assert_err, assert_ok};
use topicgen::report::{console_citations, console_line};
use topicgen::{AnalysisResult, BatchAnalysis, CitedAnswer, Error, Report};

#[test]
fn test_report_file_round_trip_with_citations()
{   let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("perplexity_api_response.md");

    let report = Report::new(
      "Perplexity API Demo Response",
      "The API offers real-time search.\n\nIt also cites sources."
    ).with_citations(vec![
      "https://docs.perplexity.ai/guides".to_string()
    , "https://www.perplexity.ai/settings/api".to_string()
    ]);

    assert_ok!(report.write_to(&path));
    let back = assert_ok!(Report::read_from(&path));

    assert_eq!(back.body, report.body);
    assert_eq!(back.citations, report.citations);
    assert_eq!(back, report);
}

#[test]
fn test_rendered_layout()
{   let report = Report::new("Title", "Body")
      .with_citations(vec![
        "https://a.example".to_string()
      , "https://b.example".to_string()
      ]);
    assert_eq!(
      report.render(),
      "# Title\n\nBody\n\n## Citations\n1. https://a.example\n2. https://b.example\n"
    );
}

#[test]
fn test_round_trip_without_citations()
{   let report = Report::new("Story", "Once upon a time.\n");
    let back = assert_ok!(Report::parse(&report.render()));
    assert_eq!(back, report);
}

#[test]
fn test_parse_rejects_bad_numbering()
{   let text = "# T\n\nBody\n\n## Citations\n1. https://a\n3. https://b\n";
    let err = assert_err!(Report::parse(text));
    assert!(matches!(err, Error::ParseError(_)));
}

#[test]
fn test_parse_rejects_missing_heading()
{   assert_err!(Report::parse("no heading here"));
}

#[test]
fn test_read_missing_file_is_io_error()
{   let dir = tempfile::tempdir().unwrap();
    let err = assert_err!(Report::read_from(dir.path().join("nope.md")));
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_report_from_answer_only_for_text()
{   let answer = CitedAnswer
    {   result: AnalysisResult::Text("cited".to_string())
      , citations: vec!["https://a.example".to_string()]
    };
    let report = Report::from_answer("Answer", &answer).unwrap();
    assert_eq!(report.body, "cited");
    assert_eq!(report.citations.len(), 1);

    let empty = CitedAnswer
    {   result: AnalysisResult::Empty
      , citations: vec![]
    };
    assert!(Report::from_answer("Answer", &empty).is_none());
}

#[test]
fn test_report_from_batch_skips_missing_topics()
{   let mut batch = BatchAnalysis::new();
    batch.insert("rust".to_string(), AnalysisResult::Text("fast".to_string()));
    batch.insert("go".to_string(), AnalysisResult::Empty);
    batch.insert(
      "zig".to_string(),
      AnalysisResult::Failure(Error::Timeout)
    );

    let report = Report::from_batch("Trends", &batch).unwrap();
    assert_eq!(report.body, "### rust\n\nfast");
    assert!(report.citations.is_empty());
}

#[test]
fn test_console_markers_are_distinct()
{   let text = console_line(
      "AI",
      &AnalysisResult::Text("popular".to_string())
    );
    let empty = console_line("AI", &AnalysisResult::Empty);
    let failed = console_line(
      "AI",
      &AnalysisResult::Failure(Error::HttpError("reset".to_string()))
    );

    assert!(text.starts_with("📊"));
    assert!(empty.starts_with("❌"));
    assert!(failed.starts_with("⚠️"));
    for line in [&text, &empty, &failed]
    {   assert!(line.contains("'AI'"));
    }
    assert!(failed.contains("reset"));
}

#[test]
fn test_console_citations_numbered_from_one()
{   let out = console_citations(&[
      "https://a.example".to_string()
    , "https://b.example".to_string()
    ]);
    assert!(out.contains("  1. https://a.example\n"));
    assert!(out.contains("  2. https://b.example\n"));
}
