use async_trait::async_trait;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::domain::error::CatalogError;
use crate::domain::models::CatalogEntry;
use crate::workflows::matchers::CatalogLookup;

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct TranslationsResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    #[serde(default)]
    data: TranslationData,
}

#[derive(Debug, Deserialize, Default)]
struct TranslationData {
    #[serde(default)]
    name: String,
}

impl TmdbClient {
    pub fn new(token: String) -> Result<Self, CatalogError> {
        Self::with_base_url(token, TMDB_API_BASE)
    }

    pub fn with_base_url(token: String, base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            token,
            base_url: base_url.into(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn search_tv(&self, query: &str) -> Result<Vec<SearchResult>, CatalogError> {
        let response: SearchResponse = self
            .get(
                "/search/tv",
                &[
                    ("query", query),
                    ("include_adult", "true"),
                    ("language", "en-US"),
                    ("page", "1"),
                ],
            )
            .await?;
        Ok(response.results)
    }

    /// Names the show goes by in other languages.
    pub async fn translated_names(&self, show_id: u64) -> Result<Vec<String>, CatalogError> {
        let response: TranslationsResponse = self
            .get(&format!("/tv/{show_id}/translations"), &[])
            .await?;
        Ok(response
            .translations
            .into_iter()
            .map(|translation| translation.data.name)
            .filter(|name| !name.is_empty())
            .collect())
    }
}

#[async_trait]
impl CatalogLookup for TmdbClient {
    async fn search_show(&self, query: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let results = self.search_tv(query).await?;
        debug!(query, results = results.len(), "TMDB search");

        // An exact title hit needs no translations.
        let query_lower = query.to_lowercase();
        if let Some(exact) = results
            .iter()
            .find(|show| show.name.to_lowercase() == query_lower)
        {
            debug!(query, id = exact.id, name = %exact.name, "TMDB exact title match");
            return Ok(vec![CatalogEntry::new(exact.id, exact.name.clone(), [&exact.name])]);
        }

        let shows = try_join_all(results.iter().map(|show| async move {
            let mut names = vec![show.name.clone()];
            names.extend(self.translated_names(show.id).await?);
            Ok::<_, CatalogError>(CatalogEntry::new(show.id, show.name.clone(), names))
        }))
        .await?;
        debug!(query, ?shows, "TMDB language variations");

        Ok(shows)
    }
}
