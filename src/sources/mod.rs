pub mod spotify;
pub mod token;
pub mod web;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::CatalogTrack;

/// Client credentials 교환으로 받은 액세스 토큰.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    /// 발급 시점 기준 유효 시간 (초)
    pub expires_in: u64,
}

/// 카탈로그 API용 bearer 토큰 제공자.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken>;
}

/// 카탈로그 트랙 검색.
/// 결과는 카탈로그의 관련도 순서를 그대로 유지해야 한다.
#[async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(&self, token: &str, query: &str) -> Result<Vec<CatalogTrack>>;
}

/// 웹 페이지 본문을 가져온다. 2xx가 아닌 응답은 `FinderError::Fetch`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}
