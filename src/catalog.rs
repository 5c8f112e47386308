use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::formats::{Book, BookId, CatalogPage};

const CLIENT_USER_AGENT: &str = concat!("gutenshelf/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("{url} returned a body that is not a catalog: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Remote source of book records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// The full catalog in one call.
    async fn fetch_all(&self) -> Result<Vec<Book>, CatalogError>;

    /// Batch lookup of the given ids.
    async fn fetch_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, CatalogError>;
}

#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpCatalogClient {
    pub fn new(endpoint: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build catalog http client")?;
        Ok(Self { client, endpoint })
    }

    async fn get_page(&self, url: Url) -> Result<Vec<Book>, CatalogError> {
        let url_str = url.to_string();
        tracing::debug!(url = %url_str, "GET catalog");

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| CatalogError::Network {
                url: url_str.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url_str,
                status,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| CatalogError::Network {
                url: url_str.clone(),
                source,
            })?;
        let page: CatalogPage =
            serde_json::from_slice(&bytes).map_err(|source| CatalogError::Decode {
                url: url_str,
                source,
            })?;
        Ok(page.results)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogClient {
    async fn fetch_all(&self) -> Result<Vec<Book>, CatalogError> {
        self.get_page(self.endpoint.clone()).await
    }

    async fn fetch_by_ids(&self, ids: &[BookId]) -> Result<Vec<Book>, CatalogError> {
        self.get_page(ids_url(&self.endpoint, ids)).await
    }
}

/// `endpoint?ids=2,5`, keeping any query the endpoint already carries.
pub fn ids_url(endpoint: &Url, ids: &[BookId]) -> Url {
    // The API expects literal commas, which form encoding would turn into %2C.
    let pair = format!("ids={}", join_ids(ids));
    let query = match endpoint.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{pair}"),
        _ => pair,
    };
    let mut url = endpoint.clone();
    url.set_query(Some(&query));
    url
}

pub fn join_ids(ids: &[BookId]) -> String {
    ids.iter()
        .map(BookId::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    /// Form shown to the user (first spelling seen in the catalog).
    pub display: String,
    /// Lowercased form used for matching and for persisting the selection.
    pub value: String,
}

/// The session's catalog. Populated by exactly one successful [`load`] and
/// never mutated afterwards; a later load replaces it wholesale.
///
/// [`load`]: CatalogStore::load
#[derive(Debug)]
pub struct CatalogStore {
    books: Vec<Book>,
    state: LoadState,
    genres: OnceLock<Vec<Genre>>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore {
    pub fn new() -> Self {
        Self {
            books: Vec::new(),
            state: LoadState::Unloaded,
            genres: OnceLock::new(),
        }
    }

    pub fn from_books(books: Vec<Book>) -> Self {
        Self {
            books,
            state: LoadState::Ready,
            genres: OnceLock::new(),
        }
    }

    /// One retrieval, no retry. On failure the store is left empty and in
    /// [`LoadState::Failed`].
    pub async fn load(&mut self, source: &dyn CatalogSource) -> Result<(), CatalogError> {
        self.books.clear();
        self.genres = OnceLock::new();

        match source.fetch_all().await {
            Ok(books) => {
                tracing::info!(books = books.len(), "catalog loaded");
                self.books = books;
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "catalog load failed");
                self.state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == LoadState::Ready
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn genres(&self) -> &[Genre] {
        self.genres.get_or_init(|| genre_vocabulary(&self.books))
    }
}

pub fn genre_vocabulary(books: &[Book]) -> Vec<Genre> {
    let mut seen = HashSet::new();
    let mut genres = Vec::new();
    for subject in books.iter().flat_map(|book| book.subjects.iter()) {
        let display = subject.trim();
        if display.is_empty() {
            continue;
        }
        let value = display.to_lowercase();
        if seen.insert(value.clone()) {
            genres.push(Genre {
                display: display.to_owned(),
                value,
            });
        }
    }
    genres
}
