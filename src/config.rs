use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::preview::PREVIEW_HOST_MARKER;
use crate::error::ConfigError;

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub spotify: SpotifyConfig,
    #[serde(default)]
    pub finder: FinderSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpotifyConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl SpotifyConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.as_ref().is_some_and(|s| !s.is_empty())
            && self.client_secret.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// 환경 변수가 설정되어 있으면 파일 값보다 우선한다.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(id) = non_empty_var(CLIENT_ID_VAR) {
            self.client_id = Some(id);
        }
        if let Some(secret) = non_empty_var(CLIENT_SECRET_VAR) {
            self.client_secret = Some(secret);
        }
        self
    }

    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Ok(Credentials {
                client_id: id.clone(),
                client_secret: secret.clone(),
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }
}

/// 확인이 끝난 Spotify 자격증명.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

/// 검색/스크래핑 동작 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderSettings {
    /// 미리듣기 CDN 호스트를 식별하는 문자열
    pub preview_host: String,
    /// 요청 하나당 타임아웃 (초)
    pub timeout_secs: u64,
    /// 검색 API에 요청하는 결과 수
    pub search_page_size: u32,
}

impl Default for FinderSettings {
    fn default() -> Self {
        Self {
            preview_host: PREVIEW_HOST_MARKER.to_string(),
            timeout_secs: 30,
            search_page_size: 20,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
        .join(".config")
        .join("preview-finder")
        .join("config.toml")
}

pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        return Config::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("설정 파일을 읽을 수 없습니다 ({}): {}", path.display(), e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

pub fn save_config(config: &Config) -> Result<()> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content)?;
    Ok(())
}
