use std::sync::Arc;
use std::time::Duration;

use futures::future::try_join_all;

use crate::config::{Config, Credentials, FinderSettings};
use crate::core::parser::build_search_query;
use crate::core::preview::PreviewScraper;
use crate::error::{ConfigError, FinderError, Result};
use crate::models::{ResultEnvelope, SearchRequest, TrackRecord};
use crate::sources::spotify::{SpotifyAuth, SpotifyCatalog};
use crate::sources::web::{build_http_client, HttpPageFetcher};
use crate::sources::{CatalogSearch, TokenProvider};

/// 곡 제목(과 아티스트)으로 카탈로그를 검색하고
/// 각 트랙 페이지에서 미리듣기 링크를 모아 결과 봉투로 돌려준다.
pub struct PreviewFinder {
    tokens: Arc<dyn TokenProvider>,
    catalog: Arc<dyn CatalogSearch>,
    scraper: PreviewScraper,
}

impl PreviewFinder {
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        catalog: Arc<dyn CatalogSearch>,
        scraper: PreviewScraper,
    ) -> Self {
        Self {
            tokens,
            catalog,
            scraper,
        }
    }

    /// Spotify 클라이언트로 구성한다. 네트워크 호출은 하지 않는다.
    pub fn spotify(credentials: Credentials, settings: &FinderSettings) -> Result<Self, ConfigError> {
        let client = build_http_client(Duration::from_secs(settings.timeout_secs))?;
        let tokens = Arc::new(SpotifyAuth::new(client.clone(), credentials));
        Ok(Self::spotify_with_tokens(client, tokens, settings))
    }

    /// 토큰 제공자를 직접 지정한다 (예: `TokenCache`).
    pub fn spotify_with_tokens(
        client: reqwest::Client,
        tokens: Arc<dyn TokenProvider>,
        settings: &FinderSettings,
    ) -> Self {
        let catalog = Arc::new(SpotifyCatalog::new(client.clone(), settings.search_page_size));
        let scraper = PreviewScraper::new(
            Arc::new(HttpPageFetcher::new(client)),
            settings.preview_host.clone(),
        );
        Self::new(tokens, catalog, scraper)
    }

    /// 환경 변수와 설정 파일에서 자격증명을 읽어 구성한다.
    /// 자격증명이 없으면 어떤 요청도 보내기 전에 `ConfigError`를 반환한다.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let credentials = config.spotify.clone().with_env_overrides().credentials()?;
        Self::spotify(credentials, &config.finder)
    }

    pub async fn find_by_song(&self, song: &str, limit: usize) -> ResultEnvelope {
        self.find(&SearchRequest::new(song).with_limit(limit)).await
    }

    pub async fn find_by_song_and_artist(
        &self,
        song: &str,
        artist: &str,
        limit: usize,
    ) -> ResultEnvelope {
        let request = SearchRequest::new(song)
            .with_artist(artist)
            .with_limit(limit);
        self.find(&request).await
    }

    /// 검색을 실행한다. 실패는 오류 대신 `success: false` 봉투로 돌려준다.
    pub async fn find(&self, request: &SearchRequest) -> ResultEnvelope {
        if request.song.trim().is_empty() {
            return ResultEnvelope::failed(None, &FinderError::missing_song());
        }

        let query = build_search_query(&request.song, request.artist.as_deref());
        tracing::info!(query = %query, limit = request.limit, "검색 시작");

        match self.collect(&query, request.limit).await {
            Ok(results) => {
                tracing::info!(query = %query, count = results.len(), "검색 완료");
                ResultEnvelope::found(query, results)
            }
            Err(e) => {
                tracing::warn!(query = %query, error = %e, "검색 실패");
                ResultEnvelope::failed(Some(query), &e)
            }
        }
    }

    /// 상위 `limit`개 트랙의 페이지를 동시에 스크래핑한다.
    /// 하나라도 실패하면 전체가 실패하며, 결과 순서는 카탈로그 순서를 따른다.
    async fn collect(&self, query: &str, limit: usize) -> Result<Vec<TrackRecord>> {
        let token = self.tokens.fetch_token().await?;
        let tracks = self.catalog.search(&token.value, query).await?;

        if tracks.is_empty() {
            return Err(FinderError::NoResults);
        }

        // 직접 만든 요청은 with_limit을 거치지 않을 수 있다
        let candidates = tracks.into_iter().take(limit.max(1));
        try_join_all(candidates.map(|track| async move {
            let previews = self.scraper.scrape(track.page_url()).await?;
            Ok::<_, FinderError>(TrackRecord::from_catalog(track, previews))
        }))
        .await
    }
}
