use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not decode catalog response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("no episode information found in path")]
    NoEpisodeInfo,

    #[error("could not find any match for name: {name:?}")]
    NoCatalogMatch { name: String },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
