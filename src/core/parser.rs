/// Build the catalog search query for a song and an optional artist.
///
/// - with artist: `track:"<song>" artist:"<artist>"`
/// - without artist: the song name verbatim
pub fn build_search_query(song: &str, artist: Option<&str>) -> String {
    match artist {
        Some(artist) if !artist.trim().is_empty() => {
            format!("track:\"{}\" artist:\"{}\"", song, artist)
        }
        _ => song.to_string(),
    }
}

/// Parse one line of a batch list into (song, artist).
///
/// Supported patterns:
/// - "Title - Artist"
/// - "Title" (no artist)
///
/// Blank lines and lines starting with `#` are skipped.
pub fn parse_song_line(line: &str) -> Option<(String, Option<String>)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    // Titles may contain " - " themselves ("Song - Remastered"), so split on the last one
    if let Some((title, artist)) = line.rsplit_once(" - ") {
        let title = title.trim();
        let artist = artist.trim();
        if !title.is_empty() && !artist.is_empty() {
            return Some((title.to_string(), Some(artist.to_string())));
        }
    }

    Some((line.to_string(), None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_search_query_with_artist() {
        assert_eq!(
            build_search_query("Shape of You", Some("Ed Sheeran")),
            "track:\"Shape of You\" artist:\"Ed Sheeran\""
        );
    }

    #[test]
    fn test_search_query_without_artist() {
        assert_eq!(build_search_query("Shape of You", None), "Shape of You");
    }

    #[test]
    fn test_search_query_blank_artist() {
        assert_eq!(build_search_query("Blueming", Some("")), "Blueming");
    }

    #[test]
    fn test_song_line_title_artist() {
        assert_eq!(
            parse_song_line("Blueming - IU"),
            Some(("Blueming".to_string(), Some("IU".to_string())))
        );
    }

    #[test]
    fn test_song_line_title_with_dash() {
        assert_eq!(
            parse_song_line("Here Comes the Sun - Remastered 2009 - The Beatles"),
            Some((
                "Here Comes the Sun - Remastered 2009".to_string(),
                Some("The Beatles".to_string())
            ))
        );
    }

    #[test]
    fn test_song_line_title_only() {
        assert_eq!(
            parse_song_line("  Blueming  "),
            Some(("Blueming".to_string(), None))
        );
    }

    #[test]
    fn test_song_line_skips_comments_and_blanks() {
        assert_eq!(parse_song_line(""), None);
        assert_eq!(parse_song_line("   "), None);
        assert_eq!(parse_song_line("# favourites"), None);
    }

    proptest! {
        /// Without an artist the query is the song name, untouched
        #[test]
        fn query_without_artist_is_verbatim(song in ".{0,40}") {
            prop_assert_eq!(build_search_query(&song, None), song);
        }

        /// With an artist the query keeps both names inside the quoted fields
        #[test]
        fn query_with_artist_is_quoted(song in "[^\"]{1,30}", artist in "[a-zA-Z0-9][a-zA-Z0-9 ]{0,20}") {
            let query = build_search_query(&song, Some(&artist));
            prop_assert_eq!(query, format!("track:\"{}\" artist:\"{}\"", song, artist));
        }
    }
}
