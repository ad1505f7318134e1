use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::models::TrackRecord;

const MAX_FILENAME_CHARS: usize = 100;

/// 파일명에 쓸 수 없는 문자를 제거하고 길이를 100자로 자른다.
/// 문자, 숫자, 공백, `-`, `_`, `.`만 남긴다.
pub fn sanitize_filename(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_' | '.'))
        .collect::<String>()
        .trim()
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect()
}

/// `"{song} - {artist}.mp3"` 형식의 파일명을 생성한다. 아티스트가 없으면 `"{song}.mp3"`.
/// 정리 후 이름이 비어 있으면 None.
pub fn build_filename(song: &str, artist: Option<&str>) -> Option<String> {
    let stem = match artist {
        Some(artist) if !artist.trim().is_empty() => format!("{} - {}", song, artist),
        _ => song.to_string(),
    };
    let stem = sanitize_filename(&stem);
    if stem.is_empty() {
        return None;
    }
    Some(format!("{stem}.mp3"))
}

/// 미리듣기 저장 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded(PathBuf),
    AlreadyExists(PathBuf),
    NoPreview,
}

/// 트랙의 첫 번째 미리듣기 파일을 출력 디렉토리에 저장한다.
pub struct PreviewDownloader {
    client: reqwest::Client,
    output_dir: PathBuf,
}

impl PreviewDownloader {
    pub fn new(client: reqwest::Client, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 이미 같은 이름의 파일이 있으면 다운로드하지 않는다.
    pub async fn save(
        &self,
        song: &str,
        artist: Option<&str>,
        track: &TrackRecord,
    ) -> Result<DownloadOutcome> {
        let Some(preview_url) = track.first_preview() else {
            return Ok(DownloadOutcome::NoPreview);
        };

        let filename = build_filename(song, artist)
            .with_context(|| format!("파일명을 만들 수 없습니다: {song}"))?;

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("디렉토리를 만들 수 없습니다: {}", self.output_dir.display()))?;

        let path = self.output_dir.join(filename);
        if tokio::fs::try_exists(&path).await? {
            return Ok(DownloadOutcome::AlreadyExists(path));
        }

        self.download(preview_url, &path).await?;
        tracing::info!(path = %path.display(), "미리듣기 저장");
        Ok(DownloadOutcome::Downloaded(path))
    }

    /// 임시 파일에 받은 뒤 이름을 바꾼다. 실패하면 임시 파일을 지운다.
    async fn download(&self, url: &str, path: &Path) -> Result<()> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("미리듣기 다운로드에 실패했습니다")?
            .error_for_status()
            .context("미리듣기 요청이 실패했습니다")?;

        let partial = path.with_extension("mp3.part");
        if let Err(e) = write_body(resp, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        tokio::fs::rename(&partial, path).await?;
        Ok(())
    }
}

/// 응답 본문을 조각 단위로 파일에 쓴다.
async fn write_body(mut resp: reqwest::Response, path: &Path) -> Result<()> {
    let mut file = tokio::fs::File::create(path)
        .await
        .with_context(|| format!("파일을 만들 수 없습니다: {}", path.display()))?;

    while let Some(chunk) = resp.chunk().await.context("미리듣기 응답 읽기에 실패했습니다")? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}
