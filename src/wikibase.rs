pub mod data;
pub mod sparql;

use crate::error::{DepictsError, Result};
use crate::wikibase::data::{Entities, SearchItem, SearchResponse};
use crate::wikibase::sparql::SparqlResponse;
use async_trait::async_trait;
use log::debug;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder};
use serde_json::Value;
use url::Url;

const WIKIDATA_API: &str = "https://www.wikidata.org/w/api.php";
const WIKIDATA_SPARQL: &str = "https://query.wikidata.org/sparql";
const DEFAULT_USER_AGENT: &str = concat!("depicts/", env!("CARGO_PKG_VERSION"));

/// Backing store of depictable entities.
#[async_trait]
pub trait EntityLookupService: Send + Sync {
    /// Free text search, returning matching entities in relevance order.
    async fn search(
        &self,
        query: &str,
        limit: u32,
        language: &str,
        uselang: &str,
        offset: u32,
    ) -> Result<Vec<SearchItem>>;

    /// Fetches entities from ids ex. "Q1233|Q546"
    async fn fetch_entities(&self, ids: &str) -> Result<Entities>;
}

#[derive(Debug, Clone)]
pub struct WikibaseConfig {
    pub api_endpoint: Url,
    pub sparql_endpoint: Url,
    pub user_agent: String,
}

impl Default for WikibaseConfig {
    fn default() -> Self {
        Self {
            api_endpoint: Url::parse(WIKIDATA_API).expect("valid wikidata api url"),
            sparql_endpoint: Url::parse(WIKIDATA_SPARQL).expect("valid wikidata sparql url"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl WikibaseConfig {
    pub fn with_api_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.api_endpoint = Url::parse(endpoint)?;
        Ok(self)
    }

    pub fn with_sparql_endpoint(mut self, endpoint: &str) -> Result<Self> {
        self.sparql_endpoint = Url::parse(endpoint)?;
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// [`EntityLookupService`] over the MediaWiki action api of a Wikibase instance.
pub struct WikibaseClient {
    config: WikibaseConfig,
    client: Client,
}

impl WikibaseClient {
    pub fn new(config: WikibaseConfig) -> Result<Self> {
        let client = ClientBuilder::default()
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { config, client })
    }

    fn search_url(&self, query: &str, limit: u32, language: &str, uselang: &str, offset: u32) -> Url {
        let mut url = self.config.api_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", "wbsearchentities")
            .append_pair("format", "json")
            .append_pair("type", "item")
            .append_pair("search", query)
            .append_pair("limit", &limit.to_string())
            .append_pair("language", language)
            .append_pair("uselang", uselang)
            .append_pair("continue", &offset.to_string());
        url
    }

    fn entities_url(&self, ids: &str) -> Url {
        let mut url = self.config.api_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("action", "wbgetentities")
            .append_pair("format", "json")
            .append_pair("ids", ids);
        url
    }

    fn sparql_url(&self, query: &str) -> Url {
        let mut url = self.config.sparql_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("format", "json");
        url
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json, application/sparql-results+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no content>".to_string());
            return Err(DepictsError::Status { status, body });
        }

        let json: Value = response.json().await?;

        match api_error(&json) {
            Some(error) => Err(error),
            None => Ok(json),
        }
    }

    pub async fn query_sparql(&self, query: &str) -> Result<SparqlResponse> {
        let json = self.get_json(self.sparql_url(query)).await?;
        Ok(serde_json::from_value(json)?)
    }
}

/// The action api reports failures as `{"error": {"code", "info"}}` with a 200 status.
fn api_error(json: &Value) -> Option<DepictsError> {
    let error = json.get("error")?;
    let field = |name: &str| {
        error
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Some(DepictsError::Api {
        code: field("code"),
        info: field("info"),
    })
}

#[async_trait]
impl EntityLookupService for WikibaseClient {
    async fn search(
        &self,
        query: &str,
        limit: u32,
        language: &str,
        uselang: &str,
        offset: u32,
    ) -> Result<Vec<SearchItem>> {
        let json = self
            .get_json(self.search_url(query, limit, language, uselang, offset))
            .await?;
        let response: SearchResponse = serde_json::from_value(json)?;

        debug!(
            "Found {} entities for search query '{query}'",
            response.search.len()
        );

        Ok(response.search)
    }

    async fn fetch_entities(&self, ids: &str) -> Result<Entities> {
        let json = self.get_json(self.entities_url(ids)).await?;
        Ok(serde_json::from_value(json)?)
    }
}
