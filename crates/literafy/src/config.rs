//! Process-wide configuration for a [`Literafy`] instance.
//!
//! Configuration is loaded once at start-up, optionally topped up with credentials from
//! the environment, and then handed to [`Literafy`] by value. Nothing in the library
//! reads configuration from ambient global state.
//!
//! # Examples
//!
//! ```no_run
//! use literafy::config::{Config, Provider};
//!
//! # fn example() -> literafy::error::Result<()> {
//! let config = Config::load(Config::default_path()?)?.with_env_overrides();
//! assert_eq!(config.llm.provider, Provider::Mistral);
//! # Ok(())
//! # }
//! ```

use super::*;

/// Environment variable consulted for the SerpAPI key when none is configured.
pub const SERPAPI_KEY_VAR: &str = "SERPAPI_API_KEY";
/// Environment variable consulted for the Mistral key when none is configured.
pub const MISTRAL_KEY_VAR: &str = "MISTRAL_API_KEY";

/// Default configuration template written by `literafy init`.
pub const DEFAULT_CONFIG: &str = include_str!("../config/literafy.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Scholarly search provider settings
  pub search:   SearchConfig,
  /// Language model settings
  pub llm:      LlmConfig,
  /// Review assembly settings
  pub review:   ReviewConfig,
  /// Output document settings
  pub document: DocumentConfig,
}

/// Settings for the SerpAPI Google Scholar search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// Search endpoint returning JSON
  pub endpoint:          String,
  /// SerpAPI engine name
  pub engine:            String,
  /// Maximum number of papers to request
  pub result_limit:      usize,
  /// SerpAPI key; falls back to [`SERPAPI_KEY_VAR`]
  pub api_key:           Option<String>,
  /// Transport timeout for a single search request
  pub http_timeout_secs: u64,
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      endpoint:          "https://serpapi.com/search.json".to_string(),
      engine:            "google_scholar".to_string(),
      result_limit:      20,
      api_key:           None,
      http_timeout_secs: 60,
    }
  }
}

/// Which chat API the [`LlmClient`](crate::llm::LlmClient) talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
  /// Mistral's hosted chat completions API
  #[default]
  Mistral,
  /// A local Ollama server
  Ollama,
}

impl Provider {
  /// Host used when the configuration does not name one.
  pub fn default_host(&self) -> &'static str {
    match self {
      Provider::Mistral => "https://api.mistral.ai",
      Provider::Ollama => "http://localhost:11434",
    }
  }

  /// Model used when the configuration does not name one.
  pub fn default_model(&self) -> &'static str {
    match self {
      Provider::Mistral => "mistral-small",
      Provider::Ollama => "llama3.2:3b",
    }
  }
}

/// Settings for the language model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
  /// Chat API flavor
  pub provider:          Provider,
  /// Model identifier; provider default when absent
  pub model:             Option<String>,
  /// Base URL; provider default when absent
  pub host:              Option<String>,
  /// API key; falls back to [`MISTRAL_KEY_VAR`] for Mistral
  pub api_key:           Option<String>,
  /// Transport timeout for a single generation request
  pub http_timeout_secs: u64,
  /// Sampling options, only sent to Ollama
  pub options:           Options,
}

impl Default for LlmConfig {
  fn default() -> Self {
    Self {
      provider:          Provider::default(),
      model:             None,
      host:              None,
      api_key:           None,
      http_timeout_secs: 120,
      options:           Options::default(),
    }
  }
}

impl LlmConfig {
  /// The model that will actually be requested.
  pub fn model(&self) -> &str { self.model.as_deref().unwrap_or(self.provider.default_model()) }

  /// The host that will actually be contacted.
  pub fn host(&self) -> &str { self.host.as_deref().unwrap_or(self.provider.default_host()) }
}

/// Configuration options for LLM inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
  /// Maximum number of tokens to generate
  pub num_predict: u64,
  /// Top-k sampling parameter
  pub top_k:       u64,
  /// Top-p (nucleus) sampling parameter
  pub top_p:       f64,
  /// Temperature for controlling randomness in generation
  pub temperature: f64,
}

impl Default for Options {
  fn default() -> Self { Self { num_predict: 16384, top_k: 50, top_p: 0.95, temperature: 0.7 } }
}

/// Settings for the review assembler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
  /// Number of papers enriched at the same time
  pub concurrency:   usize,
  /// Treat an empty search result as a failure instead of an empty review
  pub fail_on_empty: bool,
}

impl Default for ReviewConfig {
  fn default() -> Self { Self { concurrency: 4, fail_on_empty: false } }
}

/// Settings for the generated document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
  /// Line printed under the generation timestamp on the title page
  pub attribution: String,
  /// Compress PDF content streams
  pub compress:    bool,
}

impl Default for DocumentConfig {
  fn default() -> Self {
    Self { attribution: "---Literafy by CiteWise".to_string(), compress: true }
  }
}

impl Config {
  /// Path of the configuration file under the user's home directory.
  pub fn default_path() -> Result<PathBuf> {
    dirs::home_dir()
      .map(|home| home.join(".literafy").join("config.toml"))
      .ok_or_else(|| LiterafyError::Config("Could not determine home directory".to_string()))
  }

  /// Reads a configuration from a TOML file. Missing keys take their defaults.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Self::from_toml(&content)
  }

  /// Parses a configuration from a TOML string.
  pub fn from_toml(content: &str) -> Result<Self> { Ok(toml::from_str(content)?) }

  /// Writes this configuration as TOML, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    Ok(())
  }

  /// Fills missing API keys from the environment.
  pub fn with_env_overrides(mut self) -> Self {
    if self.search.api_key.is_none() {
      self.search.api_key = env_key(SERPAPI_KEY_VAR);
    }
    if self.llm.api_key.is_none() && self.llm.provider == Provider::Mistral {
      self.llm.api_key = env_key(MISTRAL_KEY_VAR);
    }
    self
  }

  /// Sets the SerpAPI key.
  pub fn with_search_key(mut self, key: &str) -> Self {
    self.search.api_key = Some(key.to_string());
    self
  }

  /// Sets the search endpoint, mostly useful for pointing at a test server.
  pub fn with_search_endpoint(mut self, endpoint: &str) -> Self {
    self.search.endpoint = endpoint.to_string();
    self
  }

  /// Sets the maximum number of papers requested from the search provider.
  pub fn with_result_limit(mut self, limit: usize) -> Self {
    self.search.result_limit = limit;
    self
  }

  /// Selects the language model provider, host and model.
  pub fn with_llm(mut self, provider: Provider, host: &str, model: &str) -> Self {
    self.llm.provider = provider;
    self.llm.host = Some(host.to_string());
    self.llm.model = Some(model.to_string());
    self
  }

  /// Sets the language model API key.
  pub fn with_llm_key(mut self, key: &str) -> Self {
    self.llm.api_key = Some(key.to_string());
    self
  }

  /// Sets how many papers are enriched concurrently.
  pub fn with_concurrency(mut self, concurrency: usize) -> Self {
    self.review.concurrency = concurrency;
    self
  }
}

fn env_key(var: &str) -> Option<String> {
  std::env::var(var).ok().filter(|value| !value.trim().is_empty())
}
