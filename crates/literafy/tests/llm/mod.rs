use mockito::{Matcher, Server};
use serde_json::json;

use super::*;

#[tokio::test]
async fn test_mistral_completion() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("POST", "/v1/chat/completions")
    .match_header("authorization", "Bearer secret")
    .match_body(Matcher::PartialJson(json!({
      "model": "mistral-small",
      "messages": [{ "role": "user", "content": "Summarize this" }]
    })))
    .with_status(200)
    .with_header("content-type", "application/json")
    .with_body(
      r#"{
        "id": "cmpl-1",
        "choices": [
          {
            "index": 0,
            "message": { "role": "assistant", "content": "A summary [1]." },
            "finish_reason": "stop"
          }
        ]
      }"#,
    )
    .create_async()
    .await;

  let config = Config::default()
    .with_llm(Provider::Mistral, &server.url(), "mistral-small")
    .with_llm_key("secret");
  let client = LlmClient::new(&config.llm)?;

  assert_eq!(client.generate("Summarize this").await?, "A summary [1].");
  mock.assert_async().await;
  Ok(())
}

#[tokio::test]
async fn test_ollama_chat() -> TestResult<()> {
  let mut server = Server::new_async().await;
  let mock = server
    .mock("POST", "/api/chat")
    .match_body(Matcher::PartialJson(json!({
      "model": "llama3.2:3b",
      "stream": false,
      "options": { "num_predict": 16384, "top_k": 50 }
    })))
    .with_status(200)
    .with_body(
      r#"{
        "model": "llama3.2:3b",
        "message": { "role": "assistant", "content": "Ching, T. et al. Title. 2018." },
        "done": true,
        "done_reason": "stop",
        "eval_count": 12
      }"#,
    )
    .create_async()
    .await;

  let config = Config::default().with_llm(Provider::Ollama, &server.url(), "llama3.2:3b");
  let client = LlmClient::new(&config.llm)?;

  assert_eq!(client.generate("Cite this").await?, "Ching, T. et al. Title. 2018.");
  mock.assert_async().await;
  Ok(())
}

#[tokio::test]
async fn test_error_status_is_reported() -> TestResult<()> {
  let mut server = Server::new_async().await;
  server
    .mock("POST", "/v1/chat/completions")
    .with_status(429)
    .with_body(r#"{ "message": "Requests rate limit exceeded" }"#)
    .create_async()
    .await;

  let config = Config::default().with_llm(Provider::Mistral, &server.url(), "mistral-small");
  let client = LlmClient::new(&config.llm)?;

  let err = client.generate("Summarize this").await.unwrap_err();
  assert!(matches!(&err, LiterafyError::ApiError(message) if message.contains("429")));
  assert!(err.to_string().contains("rate limit exceeded"));
  Ok(())
}

#[tokio::test]
async fn test_empty_choices() -> TestResult<()> {
  let mut server = Server::new_async().await;
  server
    .mock("POST", "/v1/chat/completions")
    .with_status(200)
    .with_body(r#"{ "choices": [] }"#)
    .create_async()
    .await;

  let config = Config::default().with_llm(Provider::Mistral, &server.url(), "mistral-small");
  let client = LlmClient::new(&config.llm)?;

  assert!(matches!(client.generate("Summarize this").await, Err(LiterafyError::ApiError(_))));
  Ok(())
}

#[tokio::test]
async fn test_pipeline_over_http() -> TestResult<()> {
  let mut server = Server::new_async().await;
  server
    .mock("POST", "/api/chat")
    .match_body(Matcher::Regex("Summarize the following".to_string()))
    .with_status(200)
    .with_body(r#"{ "message": { "role": "assistant", "content": "Paper [1] matters. 8/10" } }"#)
    .create_async()
    .await;
  server
    .mock("POST", "/api/chat")
    .match_body(Matcher::Regex("Create a proper citation".to_string()))
    .with_status(200)
    .with_body(r#"{ "message": { "role": "assistant", "content": "Doe, J. Paper. 2020." } }"#)
    .create_async()
    .await;

  let config = Config::default().with_llm(Provider::Ollama, &server.url(), "llama3.2:3b");
  let literafy = Literafy::builder()
    .with_config(config)
    .with_search(MockSearch::with_papers(2))
    .build()?;

  let review = literafy.compose("tidal marshes").await?;
  assert_eq!(review.body_paragraphs, vec![
    "1. Paper [1] matters. 8/10",
    "2. Paper [1] matters. 8/10"
  ]);
  assert_eq!(review.citations[1], (2, "Doe, J. Paper. 2020.".to_string()));
  Ok(())
}
