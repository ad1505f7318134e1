use std::path::Path;

use anyhow::Result;
use id3::{Tag, TagLike, Version};

use crate::models::TrackRecord;

/// 미리듣기 파일에 기록할 태그 값.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewTags {
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<i32>,
}

/// TrackRecord에서 태그 값을 만든다.
/// 표시 이름 `"제목 - 아티스트"`는 마지막 `" - "`를 기준으로 나눈다.
pub fn tag_fields(track: &TrackRecord) -> PreviewTags {
    let (title, artist) = match track.name.rsplit_once(" - ") {
        Some((title, artist)) if !artist.trim().is_empty() => {
            (title.trim().to_string(), Some(artist.trim().to_string()))
        }
        _ => (track.name.trim().to_string(), None),
    };

    PreviewTags {
        title,
        artist,
        album: Some(track.album_name.clone()).filter(|a| !a.is_empty()),
        year: parse_year(&track.release_date),
    }
}

/// "2017-03-03", "2017-03", "2017" 모두에서 연도를 읽는다.
fn parse_year(release_date: &str) -> Option<i32> {
    release_date.split('-').next().and_then(|y| y.parse().ok())
}

/// 다운로드한 미리듣기 파일에 ID3v2.4 태그를 기록한다.
pub fn write_preview_tags(path: &Path, track: &TrackRecord) -> Result<()> {
    let fields = tag_fields(track);
    let mut tag = Tag::read_from_path(path).unwrap_or_else(|_| Tag::new());

    tag.set_title(fields.title);
    if let Some(artist) = fields.artist {
        tag.set_artist(artist);
    }
    if let Some(album) = fields.album {
        tag.set_album(album);
    }
    if let Some(year) = fields.year {
        tag.set_year(year);
    }

    tag.write_to_path(path, Version::Id3v24)?;
    Ok(())
}
