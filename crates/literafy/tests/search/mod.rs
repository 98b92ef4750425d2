use mockito::{Matcher, Server};

use super::*;

fn scholar(endpoint: &str) -> SerpApiScholar {
  let config = Config::default().with_search_endpoint(endpoint).with_search_key("test-key");
  SerpApiScholar::new(&config.search).unwrap()
}

#[tokio::test]
async fn test_serpapi_request_and_parse() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("GET", "/search.json")
    .match_query(Matcher::AllOf(vec![
      Matcher::UrlEncoded("engine".into(), "google_scholar".into()),
      Matcher::UrlEncoded("q".into(), "graph neural networks".into()),
      Matcher::UrlEncoded("api_key".into(), "test-key".into()),
      Matcher::UrlEncoded("num".into(), "2".into()),
    ]))
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
      r#"{
        "organic_results": [
          { "title": "A", "snippet": "first", "link": "https://a" },
          { "title": "B", "publication_info": { "summary": "B Author - 2021" } },
          { "title": "C" }
        ]
      }"#,
    )
    .create_async()
    .await;

  let scholar = scholar(&format!("{}/search.json", server.url()));
  let results = scholar.search(&SearchQuery::new("graph neural networks")?, 2).await?;

  mock.assert_async().await;
  assert_eq!(results.len(), 2);
  assert_eq!(results[0].title.as_deref(), Some("A"));
  assert_eq!(
    results[1].publication_info.as_ref().and_then(|p| p.summary.as_deref()),
    Some("B Author - 2021")
  );
  Ok(())
}

#[tokio::test]
async fn test_serpapi_error_status_is_unavailable() -> TestResult<()> {
  let mut server = Server::new_async().await;
  server
    .mock("GET", "/search.json")
    .match_query(Matcher::Any)
    .with_status(401)
    .with_body(r#"{ "error": "Invalid API key." }"#)
    .create_async()
    .await;

  let scholar = scholar(&format!("{}/search.json", server.url()));
  let err = scholar.search(&SearchQuery::new("anything")?, 5).await.unwrap_err();
  assert!(matches!(err, LiterafyError::SearchUnavailable(_)));
  Ok(())
}

#[tokio::test]
async fn test_serpapi_garbage_is_unavailable() -> TestResult<()> {
  let mut server = Server::new_async().await;
  server
    .mock("GET", "/search.json")
    .match_query(Matcher::Any)
    .with_status(200)
    .with_body("<html>rate limited</html>")
    .create_async()
    .await;

  let scholar = scholar(&format!("{}/search.json", server.url()));
  let err = scholar.search(&SearchQuery::new("anything")?, 5).await.unwrap_err();
  assert!(matches!(err, LiterafyError::SearchUnavailable(_)));
  Ok(())
}

#[tokio::test]
async fn test_outage_through_the_pipeline() -> TestResult<()> {
  let mut server = Server::new_async().await;
  server
    .mock("GET", "/search.json")
    .match_query(Matcher::Any)
    .with_status(503)
    .create_async()
    .await;

  let config = Config::default().with_search_endpoint(&format!("{}/search.json", server.url()));
  let literafy = Literafy::builder()
    .with_config(config)
    .with_generator(MockGenerator::default())
    .build()?;

  let review = literafy.compose("soil erosion").await?;
  assert!(review.is_empty());
  Ok(())
}
