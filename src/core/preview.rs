use std::collections::HashSet;
use std::sync::Arc;

use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::sources::PageFetcher;

/// 미리듣기 오디오가 호스팅되는 CDN 호스트.
pub const PREVIEW_HOST_MARKER: &str = "p.scdn.co";

/// 마크업의 모든 요소, 모든 속성 값 중 `marker`를 포함하는 값을 모은다.
///
/// 어떤 속성에 링크가 들어있는지는 페이지 구조에 따라 바뀌므로 속성 이름은 보지 않는다.
/// 중복은 제거하고 문서에 처음 나타난 순서를 유지한다.
pub fn extract_preview_links(markup: &str, marker: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
    {
        for (_, value) in element.value().attrs() {
            if value.contains(marker) && seen.insert(value) {
                links.push(value.to_string());
            }
        }
    }

    links
}

/// 트랙 페이지를 가져와 미리듣기 링크를 추출한다.
#[derive(Clone)]
pub struct PreviewScraper {
    fetcher: Arc<dyn PageFetcher>,
    marker: String,
}

impl PreviewScraper {
    pub fn new(fetcher: Arc<dyn PageFetcher>, marker: impl Into<String>) -> Self {
        Self {
            fetcher,
            marker: marker.into(),
        }
    }

    /// 페이지 요청이 실패하면 오류, 링크가 없으면 빈 목록.
    pub async fn scrape(&self, page_url: &str) -> Result<Vec<String>> {
        let markup = self.fetcher.fetch_page(page_url).await?;
        let links = extract_preview_links(&markup, &self.marker);
        tracing::debug!(page_url, found = links.len(), "미리듣기 링크 추출");
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FinderError;
    use crate::test_utils::FakePages;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta property="og:audio" content="https://p.scdn.co/mp3-preview/aaa?cid=1">
  <meta property="og:image" content="https://i.scdn.co/image/cover">
</head>
<body>
  <audio src="https://p.scdn.co/mp3-preview/bbb"></audio>
  <div data-preview="https://p.scdn.co/mp3-preview/aaa?cid=1"></div>
  <a href="https://open.spotify.com/artist/x">Artist</a>
</body>
</html>"#;

    #[test]
    fn test_extract_matches_any_attribute() {
        let links = extract_preview_links(PAGE, PREVIEW_HOST_MARKER);
        assert_eq!(
            links,
            vec![
                "https://p.scdn.co/mp3-preview/aaa?cid=1".to_string(),
                "https://p.scdn.co/mp3-preview/bbb".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_deduplicates_across_attributes() {
        let page = r#"<html><body>
            <meta content="https://p.scdn.co/mp3-preview/same">
            <audio src="https://p.scdn.co/mp3-preview/same"></audio>
        </body></html>"#;
        let links = extract_preview_links(page, PREVIEW_HOST_MARKER);
        assert_eq!(links, vec!["https://p.scdn.co/mp3-preview/same".to_string()]);
    }

    #[test]
    fn test_extract_ignores_text_content() {
        let page = "<html><body><p>https://p.scdn.co/mp3-preview/text</p></body></html>";
        assert!(extract_preview_links(page, PREVIEW_HOST_MARKER).is_empty());
    }

    #[test]
    fn test_extract_custom_marker() {
        let page = r#"<html><body><source src="https://cdn.example.com/a.mp3"></body></html>"#;
        assert_eq!(
            extract_preview_links(page, "cdn.example.com"),
            vec!["https://cdn.example.com/a.mp3".to_string()]
        );
        assert!(extract_preview_links(page, PREVIEW_HOST_MARKER).is_empty());
    }

    #[tokio::test]
    async fn test_scrape_page_without_links() {
        let pages = FakePages::new().page("https://open.spotify.com/track/a", "<html></html>");
        let scraper = PreviewScraper::new(Arc::new(pages), PREVIEW_HOST_MARKER);
        let links = scraper.scrape("https://open.spotify.com/track/a").await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_scrape_failed_page() {
        let pages = FakePages::new().failing("https://open.spotify.com/track/a");
        let scraper = PreviewScraper::new(Arc::new(pages), PREVIEW_HOST_MARKER);
        let err = scraper
            .scrape("https://open.spotify.com/track/a")
            .await
            .unwrap_err();
        assert!(matches!(err, FinderError::Fetch { status: 404, .. }));
    }
}
