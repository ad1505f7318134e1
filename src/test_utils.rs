//! Test doubles for the catalog, token and page seams.
//!
//! Every fake records how it was called so tests can assert on call counts
//! and on the exact requests the finder made.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FinderError, Result};
use crate::models::{CatalogAlbum, CatalogArtist, CatalogTrack, ExternalUrls};
use crate::sources::{AccessToken, CatalogSearch, PageFetcher, TokenProvider};

/// Public track page URL for a catalog id.
pub fn page_url(id: &str) -> String {
    format!("https://open.spotify.com/track/{id}")
}

/// Creates a catalog track by "Ed Sheeran" with sensible defaults.
pub fn catalog_track(id: &str, name: &str) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![CatalogArtist {
            name: "Ed Sheeran".to_string(),
        }],
        album: CatalogAlbum {
            name: "÷ (Deluxe)".to_string(),
            release_date: "2017-03-03".to_string(),
        },
        popularity: 87,
        duration_ms: 233_712,
        external_urls: ExternalUrls {
            spotify: page_url(id),
        },
    }
}

/// Hands out `token-1`, `token-2`, ... or always fails.
pub struct FakeTokens {
    expires_in: u64,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeTokens {
    pub fn new(expires_in: u64) -> Self {
        Self {
            expires_in,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(0)
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for FakeTokens {
    async fn fetch_token(&self) -> Result<AccessToken> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail {
            return Err(FinderError::Auth("invalid_client".to_string()));
        }
        Ok(AccessToken {
            value: format!("token-{n}"),
            expires_in: self.expires_in,
        })
    }
}

/// Returns a fixed track list (or one error) for every search.
pub struct FakeCatalog {
    tracks: Vec<CatalogTrack>,
    failure: Mutex<Option<FinderError>>,
    queries: Mutex<Vec<String>>,
    tokens: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new(tracks: Vec<CatalogTrack>) -> Self {
        Self {
            tracks,
            failure: Mutex::new(None),
            queries: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    /// The first search returns `error`.
    pub fn failing(error: FinderError) -> Self {
        let catalog = Self::new(Vec::new());
        *catalog.failure.lock().unwrap() = Some(error);
        catalog
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSearch for FakeCatalog {
    async fn search(&self, token: &str, query: &str) -> Result<Vec<CatalogTrack>> {
        self.queries.lock().unwrap().push(query.to_string());
        self.tokens.lock().unwrap().push(token.to_string());
        let failure = self.failure.lock().unwrap().take();
        if let Some(err) = failure {
            return Err(err);
        }
        Ok(self.tracks.clone())
    }
}

enum FakePage {
    Body { markup: String, delay: Duration },
    NotFound,
}

/// Serves canned markup per URL, optionally after a delay.
/// Unknown URLs and URLs registered with `failing` answer 404.
#[derive(Default)]
pub struct FakePages {
    pages: HashMap<String, FakePage>,
    requested: Mutex<Vec<String>>,
}

impl FakePages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, markup: &str) -> Self {
        self.delayed_page(url, markup, 0)
    }

    pub fn delayed_page(mut self, url: &str, markup: &str, delay_ms: u64) -> Self {
        self.pages.insert(
            url.to_string(),
            FakePage::Body {
                markup: markup.to_string(),
                delay: Duration::from_millis(delay_ms),
            },
        );
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.pages.insert(url.to_string(), FakePage::NotFound);
        self
    }

    pub fn calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakePages {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(FakePage::Body { markup, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(*delay).await;
                }
                Ok(markup.clone())
            }
            Some(FakePage::NotFound) | None => Err(FinderError::Fetch {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
