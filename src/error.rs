use thiserror::Error;

/// 검색 한 번을 처리하는 동안 발생할 수 있는 오류.
/// 오케스트레이터 경계에서 모두 실패 봉투(`ResultEnvelope`)로 변환된다.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Spotify authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to fetch {url}: HTTP {status}")]
    Fetch { url: String, status: u16 },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("No songs found")]
    NoResults,
}

impl FinderError {
    pub fn missing_song() -> Self {
        FinderError::InvalidArgument("Song name is required".to_string())
    }
}

/// 자격증명 누락 등 호출 자체가 불가능한 설정 오류.
/// 봉투로 변환되지 않고 생성 시점에 그대로 반환된다.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set in environment variables")]
    MissingCredentials,

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T, E = FinderError> = std::result::Result<T, E>;
