use serde::{Deserialize, Serialize};

use crate::error::FinderError;

/// 요청 하나에서 가져올 트랙 수의 기본값.
pub const DEFAULT_LIMIT: usize = 5;

/// 곡 검색 요청.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub song: String,
    pub artist: Option<String>,
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(song: impl Into<String>) -> Self {
        Self {
            song: song.into(),
            artist: None,
            limit: DEFAULT_LIMIT,
        }
    }

    /// 빈 문자열은 아티스트 없음으로 취급한다.
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        let artist = artist.into();
        self.artist = if artist.trim().is_empty() {
            None
        } else {
            Some(artist)
        };
        self
    }

    /// limit은 최소 1이다.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }
}

/// 카탈로그 검색 API가 돌려주는 트랙 항목 (원본 그대로).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<CatalogArtist>,
    pub album: CatalogAlbum,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub duration_ms: u64,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogAlbum {
    pub name: String,
    #[serde(default)]
    pub release_date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

impl CatalogTrack {
    /// 공개 트랙 페이지 URL.
    pub fn page_url(&self) -> &str {
        &self.external_urls.spotify
    }
}

/// 결과 봉투에 담기는 정규화된 트랙 정보.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    /// `"제목 - 아티스트1, 아티스트2"`
    pub name: String,
    pub canonical_url: String,
    pub preview_urls: Vec<String>,
    pub track_id: String,
    pub album_name: String,
    pub release_date: String,
    pub popularity: u32,
    pub duration_ms: u64,
}

impl TrackRecord {
    pub fn from_catalog(track: CatalogTrack, preview_urls: Vec<String>) -> Self {
        let artists = track
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            name: format!("{} - {}", track.name, artists),
            canonical_url: track.external_urls.spotify,
            preview_urls,
            track_id: track.id,
            album_name: track.album.name,
            release_date: track.album.release_date,
            popularity: track.popularity.min(100),
            duration_ms: track.duration_ms,
        }
    }

    pub fn first_preview(&self) -> Option<&str> {
        self.preview_urls.first().map(String::as_str)
    }
}

/// 모든 검색 호출이 돌려주는 성공/실패 래퍼.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    pub results: Vec<TrackRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultEnvelope {
    pub fn found(search_query: String, results: Vec<TrackRecord>) -> Self {
        Self {
            success: true,
            search_query: Some(search_query),
            results,
            error: None,
        }
    }

    pub fn failed(search_query: Option<String>, error: &FinderError) -> Self {
        Self {
            success: false,
            search_query,
            results: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}
