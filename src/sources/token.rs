use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::sources::{AccessToken, TokenProvider};

/// 만료 전 이 시간 안으로 들어오면 토큰을 새로 받는다.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

struct CachedToken {
    token: AccessToken,
    expires_at: Instant,
}

/// 다른 `TokenProvider`를 감싸 만료 직전까지 토큰을 재사용한다.
/// 여러 곡을 연속으로 검색하는 배치 작업에서 사용한다.
pub struct TokenCache<P> {
    inner: P,
    cached: Mutex<Option<CachedToken>>,
}

impl<P: TokenProvider> TokenCache<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }
}

#[async_trait]
impl<P: TokenProvider> TokenProvider for TokenCache<P> {
    async fn fetch_token(&self) -> Result<AccessToken> {
        let mut cached = self.cached.lock().await;

        if let Some(entry) = cached.as_ref() {
            if Instant::now() + REFRESH_MARGIN < entry.expires_at {
                return Ok(entry.token.clone());
            }
            tracing::debug!("캐시된 토큰이 만료되어 새로 발급받습니다");
        }

        let token = self.inner.fetch_token().await?;
        *cached = Some(CachedToken {
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
            token: token.clone(),
        });
        Ok(token)
    }
}
