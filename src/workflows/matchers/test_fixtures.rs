use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::CatalogLookup;
use crate::domain::error::CatalogError;
use crate::domain::models::CatalogEntry;

/// In-memory catalog that records every query it receives.
#[derive(Default)]
pub struct FakeCatalog {
    responses: HashMap<String, Vec<CatalogEntry>>,
    queries: Mutex<Vec<String>>,
    failing: bool,
}

impl FakeCatalog {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn with(mut self, query: &str, shows: Vec<CatalogEntry>) -> Self {
        self.responses.insert(query.to_string(), shows);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl CatalogLookup for FakeCatalog {
    async fn search_show(&self, query: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.queries.lock().push(query.to_string());
        if self.failing {
            return Err(CatalogError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}
