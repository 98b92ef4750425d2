//! Scholarly search: the query type, the provider's raw records, and the SerpAPI client.
//!
//! Ranking is entirely the provider's business. The pipeline only relies on two
//! properties of a [`SearchProvider`]: results come back in the provider's order, and
//! there are never more than the requested limit.

use super::*;

/// A validated research topic.
///
/// # Examples
///
/// ```
/// use literafy::scholar::SearchQuery;
///
/// let query = SearchQuery::new("  protein folding ").unwrap();
/// assert_eq!(query.as_str(), "protein folding");
/// assert!(SearchQuery::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
  /// Trims the topic and rejects it if nothing is left.
  pub fn new(topic: &str) -> Result<Self> {
    let topic = topic.trim();
    if topic.is_empty() {
      return Err(LiterafyError::InvalidTopic);
    }
    Ok(Self(topic.to_string()))
  }

  /// The topic text.
  pub fn as_str(&self) -> &str { &self.0 }
}

impl Display for SearchQuery {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(&self.0) }
}

/// One unprocessed search hit. Every field is optional and may be JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
  /// Paper title
  #[serde(default)]
  pub title:            Option<String>,
  /// Short excerpt, used as the abstract
  #[serde(default)]
  pub snippet:          Option<String>,
  /// Landing page of the paper
  #[serde(default)]
  pub link:             Option<String>,
  /// Authors, venue and year as one provider-formatted line
  #[serde(default)]
  pub publication_info: Option<PublicationInfo>,
}

/// Nested publication details of a [`RawResult`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationInfo {
  /// e.g. `"T Ching, DS Himmelstein… - Journal of The Royal Society …, 2018"`
  #[serde(default)]
  pub summary: Option<String>,
}

/// Shape of a SerpAPI Google Scholar response, reduced to what we read.
#[derive(Debug, Deserialize)]
struct ScholarResponse {
  #[serde(default)]
  organic_results: Option<Vec<RawResult>>,
  #[serde(default)]
  error:           Option<String>,
}

/// Anything that can turn a topic into an ordered list of candidate papers.
#[async_trait]
pub trait SearchProvider: Send + Sync {
  /// Runs one search, returning at most `limit` results in provider order.
  ///
  /// # Errors
  ///
  /// Returns [`LiterafyError::SearchUnavailable`] when the provider cannot be reached or
  /// its answer cannot be understood.
  async fn search(&self, query: &SearchQuery, limit: usize) -> Result<Vec<RawResult>>;
}

/// Google Scholar through SerpAPI.
#[derive(Debug, Clone)]
pub struct SerpApiScholar {
  /// Endpoint returning JSON
  endpoint: Url,
  /// SerpAPI engine parameter
  engine:   String,
  /// Credential sent as the `api_key` parameter
  api_key:  Option<String>,
  /// Shared HTTP client
  client:   reqwest::Client,
}

impl SerpApiScholar {
  /// Creates a client from the search section of the configuration.
  pub fn new(config: &SearchConfig) -> Result<Self> {
    let endpoint = Url::parse(&config.endpoint)
      .map_err(|e| LiterafyError::Config(format!("Invalid search endpoint: {e}")))?;
    if config.api_key.is_none() {
      warn!("No SerpAPI key configured, searches will likely be rejected");
    }
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.http_timeout_secs))
      .build()?;
    Ok(Self { endpoint, engine: config.engine.clone(), api_key: config.api_key.clone(), client })
  }

  /// Builds the full request URL for a query.
  pub fn request_url(&self, query: &SearchQuery, limit: usize) -> Url {
    let mut url = self.endpoint.clone();
    {
      let mut pairs = url.query_pairs_mut();
      pairs.append_pair("engine", &self.engine).append_pair("q", query.as_str());
      if let Some(key) = &self.api_key {
        pairs.append_pair("api_key", key);
      }
      pairs.append_pair("num", &limit.to_string());
    }
    url
  }
}

#[async_trait]
impl SearchProvider for SerpApiScholar {
  async fn search(&self, query: &SearchQuery, limit: usize) -> Result<Vec<RawResult>> {
    let url = self.request_url(query, limit);
    debug!("Searching {} for \"{}\" (limit {})", self.endpoint, query, limit);

    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| LiterafyError::SearchUnavailable(e.to_string()))?;
    let status = response.status();
    let body = response.bytes().await.map_err(|e| LiterafyError::SearchUnavailable(e.to_string()))?;
    trace!("Search response ({status}): {}", String::from_utf8_lossy(&body));

    if !status.is_success() {
      return Err(LiterafyError::SearchUnavailable(format!("search returned status {status}")));
    }

    let results = parse_results(&body)?;
    Ok(results.into_iter().take(limit).collect())
  }
}

/// Parses a SerpAPI JSON body into raw results.
///
/// A body without `organic_results` is an empty result set; a body that is not JSON, or
/// that carries SerpAPI's `error` field without results, is [`LiterafyError::SearchUnavailable`].
pub fn parse_results(body: &[u8]) -> Result<Vec<RawResult>> {
  let response: ScholarResponse = serde_json::from_slice(body)
    .map_err(|e| LiterafyError::SearchUnavailable(format!("failed to decode JSON: {e}")))?;

  match (response.organic_results, response.error) {
    (Some(results), _) => Ok(results),
    (None, Some(error)) if !error.contains("hasn't returned any results") =>
      Err(LiterafyError::SearchUnavailable(error)),
    (None, _) => Ok(Vec::new()),
  }
}
