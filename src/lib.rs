//! Spotify 카탈로그에서 곡을 검색하고, 각 트랙의 공개 페이지에서
//! 미리듣기 오디오 URL을 찾아 하나의 결과 봉투로 돌려준다.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod sources;

#[cfg(test)]
pub mod test_utils;

pub use crate::core::finder::PreviewFinder;
pub use crate::error::{ConfigError, FinderError};
pub use crate::models::{ResultEnvelope, SearchRequest, TrackRecord, DEFAULT_LIMIT};
