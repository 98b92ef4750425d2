//! Client for the chat-style language model APIs used to write summaries and citations.
//!
//! Two providers are supported behind one [`Generate`] implementation:
//!
//! - [`Provider::Mistral`]: hosted chat completions (`/v1/chat/completions`)
//! - [`Provider::Ollama`]: a local Ollama server (`/api/chat`)
//!
//! Every call is a single user message and a single answer; no conversation state is
//! kept between calls, so one client can serve many papers concurrently.
//!
//! # Examples
//!
//! ```no_run
//! use literafy::{
//!   config::{LlmConfig, Provider},
//!   llm::{Generate, LlmClient},
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = LlmConfig { provider: Provider::Ollama, ..LlmConfig::default() };
//! let client = LlmClient::new(&config)?;
//! let answer = client.generate("What is the capital of France?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```

use super::*;

/// Turns a prompt into generated text.
///
/// The seam the summarizer and citation synthesizer are written against; tests swap in
/// scripted implementations.
#[async_trait]
pub trait Generate: Send + Sync {
  /// Sends `prompt` as a single user message and returns the model's reply verbatim.
  async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Message structure for LLM interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  /// "user" for prompts, "assistant" for model replies
  pub role:    String,
  /// Message text
  pub content: String,
}

/// Request body shared by both providers.
///
/// Ollama-only fields are left out of the JSON when unset.
#[derive(Debug, Default, Serialize)]
pub struct ChatRequest {
  /// Model identifier. Required before sending.
  pub model:    Option<String>,
  /// Conversation so far. Must contain at least one message before sending.
  pub messages: Vec<Message>,
  /// Ollama streams by default; we always ask for one complete answer
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stream:   Option<bool>,
  /// Ollama sampling options
  #[serde(skip_serializing_if = "Option::is_none")]
  pub options:  Option<Options>,
}

impl ChatRequest {
  /// Creates an empty request.
  pub fn new() -> Self { Self::default() }

  /// Sets the model to use for the request.
  pub fn with_model(mut self, model: &str) -> Self {
    self.model.replace(model.to_string());
    self
  }

  /// Adds a user message to the conversation.
  pub fn with_message(mut self, content: &str) -> Self {
    self.messages.push(Message { role: "user".to_string(), content: content.to_string() });
    self
  }

  /// Disables streaming and attaches sampling options (Ollama).
  pub fn with_options(mut self, options: Options) -> Self {
    self.stream = Some(false);
    self.options = Some(options);
    self
  }
}

/// Ollama `/api/chat` reply.
#[derive(Debug, Deserialize)]
pub struct OllamaResponse {
  /// Name of the model used
  #[serde(default)]
  pub model:       String,
  /// Generated message content
  pub message:     Message,
  /// Reason for completion
  #[serde(default)]
  pub done_reason: Option<String>,
  /// Number of generated tokens
  #[serde(default)]
  pub eval_count:  Option<u64>,
}

/// Chat completions reply.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
  /// Candidate answers; we only ever read the first
  pub choices: Vec<Choice>,
}

/// One candidate answer of a [`CompletionResponse`].
#[derive(Debug, Deserialize)]
pub struct Choice {
  /// The generated message
  pub message:       Message,
  /// Reason for completion
  #[serde(default)]
  pub finish_reason: Option<String>,
}

/// HTTP client for the configured chat API.
#[derive(Debug, Clone)]
pub struct LlmClient {
  /// Which API shape to speak
  provider: Provider,
  /// Full chat endpoint
  url:      Url,
  /// Model identifier
  model:    String,
  /// Bearer token, if any
  api_key:  Option<String>,
  /// Sampling options forwarded to Ollama
  options:  Options,
  /// Shared HTTP client
  client:   reqwest::Client,
}

impl LlmClient {
  /// Creates a client from the LLM section of the configuration.
  ///
  /// # Errors
  ///
  /// Returns [`LiterafyError::Config`] when the host is not a valid URL.
  pub fn new(config: &LlmConfig) -> Result<Self> {
    let host = Url::parse(config.host())
      .map_err(|e| LiterafyError::Config(format!("Invalid LLM host {:?}: {e}", config.host())))?;
    let path = match config.provider {
      Provider::Mistral => "v1/chat/completions",
      Provider::Ollama => "api/chat",
    };
    let url =
      host.join(path).map_err(|e| LiterafyError::Config(format!("Invalid LLM endpoint: {e}")))?;

    if config.provider == Provider::Mistral && config.api_key.is_none() {
      warn!("No Mistral API key configured, generation requests will likely be rejected");
    }

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.http_timeout_secs))
      .build()?;

    Ok(Self {
      provider: config.provider,
      url,
      model: config.model().to_string(),
      api_key: config.api_key.clone(),
      options: config.options.clone(),
      client,
    })
  }

  /// The chat endpoint requests are sent to.
  pub fn url(&self) -> &Url { &self.url }

  /// The model requests ask for.
  pub fn model(&self) -> &str { &self.model }

  /// Sends a prepared request and returns the first answer's text.
  ///
  /// # Errors
  ///
  /// This function will return an error if:
  /// - No model is specified
  /// - No messages are provided
  /// - The network request fails
  /// - The API answers with a non-success status
  /// - The response cannot be parsed or holds no answer
  pub async fn send(&self, request: &ChatRequest) -> Result<String> {
    if request.model.is_none() {
      return Err(LiterafyError::LLMMissingModel);
    }
    if request.messages.is_empty() {
      return Err(LiterafyError::LLMMissingMessage);
    }

    debug!("Sending chat request to {} ({})", self.url, self.model);
    let mut builder = self.client.post(self.url.clone()).json(request);
    if let Some(key) = &self.api_key {
      builder = builder.bearer_auth(key);
    }

    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    trace!("Chat response ({status}): {}", String::from_utf8_lossy(&body));

    if !status.is_success() {
      return Err(LiterafyError::ApiError(format!(
        "{} returned {status}: {}",
        self.url,
        String::from_utf8_lossy(&body).trim()
      )));
    }

    match self.provider {
      Provider::Ollama => {
        let response: OllamaResponse = serde_json::from_slice(&body)?;
        Ok(response.message.content)
      },
      Provider::Mistral => {
        let response: CompletionResponse = serde_json::from_slice(&body)?;
        response
          .choices
          .into_iter()
          .next()
          .map(|choice| choice.message.content)
          .ok_or_else(|| LiterafyError::ApiError("Completion contained no choices".to_string()))
      },
    }
  }

  /// Builds the single-message request for `prompt`.
  pub fn request(&self, prompt: &str) -> ChatRequest {
    let request = ChatRequest::new().with_model(&self.model).with_message(prompt);
    match self.provider {
      Provider::Ollama => request.with_options(self.options.clone()),
      Provider::Mistral => request,
    }
  }
}

#[async_trait]
impl Generate for LlmClient {
  async fn generate(&self, prompt: &str) -> Result<String> {
    self.send(&self.request(prompt)).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoints() {
    let mistral = LlmClient::new(&LlmConfig::default()).unwrap();
    assert_eq!(mistral.url().as_str(), "https://api.mistral.ai/v1/chat/completions");
    assert_eq!(mistral.model(), "mistral-small");

    let ollama =
      LlmClient::new(&LlmConfig { provider: Provider::Ollama, ..LlmConfig::default() }).unwrap();
    assert_eq!(ollama.url().as_str(), "http://localhost:11434/api/chat");
  }

  #[test]
  fn test_invalid_host() {
    let config = LlmConfig { host: Some("not a url".to_string()), ..LlmConfig::default() };
    assert!(matches!(LlmClient::new(&config), Err(LiterafyError::Config(_))));
  }

  #[test]
  fn test_request_bodies() {
    let mistral = LlmClient::new(&LlmConfig::default()).unwrap();
    let body = serde_json::to_value(mistral.request("hi")).unwrap();
    assert_eq!(body["model"], "mistral-small");
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], "hi");
    assert!(body.get("stream").is_none());
    assert!(body.get("options").is_none());

    let ollama =
      LlmClient::new(&LlmConfig { provider: Provider::Ollama, ..LlmConfig::default() }).unwrap();
    let body = serde_json::to_value(ollama.request("hi")).unwrap();
    assert_eq!(body["stream"], false);
    assert_eq!(body["options"]["top_k"], 50);
  }

  #[tokio::test]
  async fn test_missing_parts() {
    let client = LlmClient::new(&LlmConfig::default()).unwrap();
    let no_model = ChatRequest::new().with_message("hi");
    assert!(matches!(client.send(&no_model).await, Err(LiterafyError::LLMMissingModel)));
    let no_message = ChatRequest::new().with_model("mistral-small");
    assert!(matches!(client.send(&no_message).await, Err(LiterafyError::LLMMissingMessage)));
  }

  #[traced_test]
  #[test]
  fn test_missing_key_warns() {
    LlmClient::new(&LlmConfig::default()).unwrap();
    assert!(logs_contain("No Mistral API key configured"));
  }

  #[ignore = "Can't run this in general -- relies on local LLM endpoint."]
  #[tokio::test]
  async fn test_local_ollama() {
    let client =
      LlmClient::new(&LlmConfig { provider: Provider::Ollama, ..LlmConfig::default() }).unwrap();
    let answer = client.generate("Please tell me what is the capital of France?").await.unwrap();
    assert!(answer.contains("Paris"))
  }
}
