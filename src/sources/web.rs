use std::time::Duration;

use async_trait::async_trait;

use crate::error::{FinderError, Result};
use crate::sources::PageFetcher;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 브라우저 User-Agent와 요청별 타임아웃을 가진 HTTP 클라이언트를 만든다.
/// 토큰, 검색, 페이지 요청이 같은 커넥션 풀을 공유한다.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// 공개 트랙 페이지를 가져오는 `PageFetcher`.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FinderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FinderError::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        resp.text()
            .await
            .map_err(|e| FinderError::Network(e.to_string()))
    }
}
