use async_trait::async_trait;
use base64::Engine;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Credentials;
use crate::error::{FinderError, Result};
use crate::models::CatalogTrack;
use crate::sources::{AccessToken, CatalogSearch, TokenProvider};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    tracks: TracksResult,
}

#[derive(Deserialize)]
struct TracksResult {
    items: Vec<CatalogTrack>,
}

/// Client credentials 방식의 Spotify 인증.
/// 호출할 때마다 새 토큰을 발급받는다. 재사용은 `TokenCache`가 맡는다.
pub struct SpotifyAuth {
    client: reqwest::Client,
    credentials: Credentials,
}

impl SpotifyAuth {
    pub fn new(client: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    fn basic_header(&self) -> String {
        let raw = format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        );
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }
}

#[async_trait]
impl TokenProvider for SpotifyAuth {
    async fn fetch_token(&self) -> Result<AccessToken> {
        let resp = self
            .client
            .post(TOKEN_URL)
            .header("Authorization", self.basic_header())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| FinderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FinderError::Auth(format!(
                "token endpoint returned HTTP {}; check client id and secret",
                status.as_u16()
            )));
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| FinderError::Parse(e.to_string()))?;

        tracing::debug!(expires_in = token.expires_in, "Spotify 토큰 발급");
        Ok(AccessToken {
            value: token.access_token,
            expires_in: token.expires_in,
        })
    }
}

/// Spotify 트랙 검색 클라이언트.
pub struct SpotifyCatalog {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl SpotifyCatalog {
    pub fn new(client: reqwest::Client, page_size: u32) -> Self {
        Self {
            client,
            base_url: API_BASE.to_string(),
            page_size: page_size.clamp(1, 50),
        }
    }
}

/// 검색 응답 상태 코드를 오류로 분류한다. 성공이면 None.
fn search_status_error(status: StatusCode) -> Option<FinderError> {
    if status.is_success() {
        None
    } else if status == StatusCode::UNAUTHORIZED {
        Some(FinderError::Auth(
            "access token is invalid or expired".to_string(),
        ))
    } else {
        Some(FinderError::Network(format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        )))
    }
}

fn parse_search_body(body: &str) -> Result<Vec<CatalogTrack>> {
    let resp: SearchResponse =
        serde_json::from_str(body).map_err(|e| FinderError::Parse(e.to_string()))?;
    Ok(resp.tracks.items)
}

#[async_trait]
impl CatalogSearch for SpotifyCatalog {
    async fn search(&self, token: &str, query: &str) -> Result<Vec<CatalogTrack>> {
        let page_size = self.page_size.to_string();
        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .bearer_auth(token)
            .query(&[("q", query), ("type", "track"), ("limit", page_size.as_str())])
            .send()
            .await
            .map_err(|e| FinderError::Network(e.to_string()))?;

        if let Some(err) = search_status_error(resp.status()) {
            return Err(err);
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FinderError::Network(e.to_string()))?;
        let tracks = parse_search_body(&body)?;
        tracing::debug!(query, count = tracks.len(), "Spotify 검색 완료");
        Ok(tracks)
    }
}
