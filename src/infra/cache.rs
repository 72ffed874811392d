use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domain::error::CatalogError;
use crate::domain::models::CatalogEntry;
use crate::workflows::matchers::CatalogLookup;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Cache {
    pub shows: HashMap<String, Vec<CatalogEntry>>, // raw query -> catalog response
}

impl Cache {
    pub fn load(cache_path: &Path) -> Self {
        if !cache_path.exists() {
            info!(path = %cache_path.display(), "no lookup cache yet, starting empty");
            return Cache::default();
        }

        let loaded = fs::read_to_string(cache_path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<Cache>(&content)?));
        match loaded {
            Ok(cache) => {
                debug!(path = %cache_path.display(), queries = cache.shows.len(), "loaded lookup cache");
                cache
            }
            Err(e) => {
                warn!(path = %cache_path.display(), error = %e, "could not read lookup cache, starting empty");
                Cache::default()
            }
        }
    }

    pub fn save(&self, cache_path: &Path) -> Result<()> {
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create cache directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)
            .with_context(|| format!("Failed to write cache file {}", cache_path.display()))?;
        Ok(())
    }

    pub fn get_shows(&self, query: &str) -> Option<&Vec<CatalogEntry>> {
        self.shows.get(query)
    }

    pub fn set_shows(&mut self, query: String, shows: Vec<CatalogEntry>) {
        self.shows.insert(query, shows);
    }
}

/// A catalog whose answers are remembered for the life of the process and
/// persisted to `cache_path` on [`CachedCatalog::save`]. Failed lookups are
/// not remembered.
pub struct CachedCatalog<C> {
    inner: C,
    cache: Mutex<Cache>,
    cache_path: PathBuf,
}

impl<C: CatalogLookup> CachedCatalog<C> {
    pub fn load(inner: C, cache_path: impl Into<PathBuf>) -> Self {
        let cache_path = cache_path.into();
        let cache = Cache::load(&cache_path);
        Self {
            inner,
            cache: Mutex::new(cache),
            cache_path,
        }
    }

    pub fn save(&self) -> Result<()> {
        self.cache.lock().save(&self.cache_path)
    }
}

#[async_trait]
impl<C: CatalogLookup> CatalogLookup for CachedCatalog<C> {
    async fn search_show(&self, query: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let cached = self.cache.lock().get_shows(query).cloned();
        if let Some(shows) = cached {
            debug!(query, "lookup cache hit");
            return Ok(shows);
        }

        let shows = self.inner.search_show(query).await?;
        self.cache.lock().set_shows(query.to_string(), shows.clone());
        Ok(shows)
    }
}
