use super::*;

fn texts(document: &Document) -> Vec<String> {
  document.blocks.iter().filter_map(Block::text).map(str::to_string).collect()
}

#[tokio::test]
async fn test_empty_search_still_produces_a_review() -> TestResult<()> {
  let literafy = literafy(MockSearch::with_papers(0), MockGenerator::default());

  let review = literafy.compose("quantum error correction").await?;
  assert!(review.is_empty());
  assert_eq!(review.title, "Literature Review: quantum error correction");
  assert!(review.citations.is_empty());
  assert!(review.links.is_empty());

  let artifact = literafy.review("quantum error correction").await?;
  assert_eq!(artifact.media_type, "application/pdf");
  assert!(artifact.bytes.starts_with(b"%PDF-"));
  Ok(())
}

#[tokio::test]
async fn test_three_papers_in_order() -> TestResult<()> {
  let renderer = CapturingRenderer::default();
  let documents = renderer.documents.clone();
  let literafy = Literafy::builder()
    .with_search(MockSearch::with_papers(3))
    .with_generator(MockGenerator::default())
    .with_renderer(renderer)
    .build()?;

  let artifact = literafy.review("coral reef bleaching").await?;
  assert_eq!(artifact.bytes, b"rendered");

  let documents = documents.lock().unwrap();
  let texts = texts(&documents[0]);
  assert_eq!(texts[0], "Literature Review: coral reef bleaching");
  assert!(texts[1].starts_with("Generated on: "));
  assert_eq!(texts[3..], [
    "1. Paper 1 [1] studies the topic. Relevance: 7/10",
    "2. Paper 2 [2] studies the topic. Relevance: 7/10",
    "3. Paper 3 [3] studies the topic. Relevance: 7/10",
    "Bibliography",
    "[1] Citation for Paper 1",
    "[2] Citation for Paper 2",
    "[3] Citation for Paper 3",
    "Links",
    "[1] https://papers.example/1",
    "[2] https://papers.example/2",
    "[3] https://papers.example/3",
  ]);
  Ok(())
}

#[tokio::test]
async fn test_order_survives_out_of_order_completion() -> TestResult<()> {
  let literafy = literafy(MockSearch::with_papers(6), MockGenerator::reversed());

  let review = literafy.compose("permafrost thaw").await?;
  let indices: Vec<usize> = review.citations.iter().map(|(i, _)| *i).collect();
  assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
  assert_eq!(review.links.len(), 6);
  assert_eq!(review.body_paragraphs.len(), 6);
  for (i, paragraph) in review.body_paragraphs.iter().enumerate() {
    assert!(paragraph.starts_with(&format!("{}. Paper {} [{}]", i + 1, i + 1, i + 1)));
  }
  Ok(())
}

#[tokio::test]
async fn test_failed_citation_aborts_the_review() {
  let renderer = CapturingRenderer::default();
  let documents = renderer.documents.clone();
  let literafy = Literafy::builder()
    .with_search(MockSearch::with_papers(3))
    .with_generator(MockGenerator::failing("Paper 2", Stage::Citation))
    .with_renderer(renderer)
    .build()
    .unwrap();

  let err = literafy.review("ocean acidification").await.unwrap_err();
  assert!(
    matches!(err, LiterafyError::RemoteGeneration { index: 2, stage: Stage::Citation, .. }),
    "unexpected error: {err}"
  );
  assert!(err.to_string().contains("503 for Paper 2"));
  assert!(documents.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_summary_is_tagged() {
  let literafy =
    literafy(MockSearch::with_papers(4), MockGenerator::failing("Paper 4", Stage::Summary));

  let err = literafy.compose("wildfire smoke").await.unwrap_err();
  assert!(matches!(err, LiterafyError::RemoteGeneration { index: 4, stage: Stage::Summary, .. }));
}

#[tokio::test]
async fn test_missing_link_keeps_its_slot() -> TestResult<()> {
  let mut second = paper(2);
  second.link = None;
  let literafy =
    literafy(MockSearch::with_results(vec![paper(1), second, paper(3)]), MockGenerator::default());

  let review = literafy.compose("urban heat islands").await?;
  assert_eq!(review.links[1], (2, String::new()));

  let document = literafy::document::DocumentBuilder::default().build(&review);
  let texts = texts(&document);
  assert!(texts.contains(&"[2] ".to_string()));
  assert!(texts.contains(&"[3] https://papers.example/3".to_string()));
  Ok(())
}

#[tokio::test]
async fn test_unknown_fields_are_normalized_before_prompting() -> TestResult<()> {
  let generator = MockGenerator::default();
  let prompts = generator.prompts.clone();
  let literafy = literafy(MockSearch::with_results(vec![RawResult::default()]), generator);

  let review = literafy.compose("tidal energy").await?;
  assert_eq!(review.len(), 1);

  let prompts = prompts.lock().unwrap();
  assert_eq!(prompts.len(), 2);
  assert!(prompts[0].contains("Title: Unknown Title\nAbstract: No abstract available\n"));
  assert!(prompts[1].contains("Title: Unknown Title\nSummary: \n"));
  Ok(())
}

#[tokio::test]
async fn test_search_outage_degrades_to_empty() -> TestResult<()> {
  let search = MockSearch::unavailable();
  let calls = search.calls.clone();
  let generator = MockGenerator::default();
  let prompts = generator.prompts.clone();
  let literafy = literafy(search, generator);

  let review = literafy.compose("glacier retreat").await?;
  assert!(review.is_empty());
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert!(prompts.lock().unwrap().is_empty());
  Ok(())
}

#[tokio::test]
async fn test_fail_on_empty() {
  let mut config = Config::default();
  config.review.fail_on_empty = true;
  let literafy = Literafy::builder()
    .with_config(config)
    .with_search(MockSearch::unavailable())
    .with_generator(MockGenerator::default())
    .build()
    .unwrap();

  let err = literafy.compose("glacier retreat").await.unwrap_err();
  assert!(matches!(err, LiterafyError::SearchUnavailable(_)));
}

#[tokio::test]
async fn test_blank_topic_is_rejected_before_searching() {
  let search = MockSearch::with_papers(2);
  let calls = search.calls.clone();
  let literafy = literafy(search, MockGenerator::default());

  let err = literafy.review(" \t ").await.unwrap_err();
  assert!(matches!(err, LiterafyError::InvalidTopic));
  assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_result_limit_is_forwarded() -> TestResult<()> {
  let literafy = Literafy::builder()
    .with_config(Config::default().with_result_limit(2))
    .with_search(MockSearch::with_papers(5))
    .with_generator(MockGenerator::default())
    .build()?;

  let records = literafy.search("seagrass meadows").await?;
  assert_eq!(records.len(), 2);
  assert_eq!(records[1].title, "Paper 2");
  assert_eq!(records[1].summary_info, "Author 2 - Journal, 2002");
  Ok(())
}
