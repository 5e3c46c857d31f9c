//! YouTube video identifier extraction.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // Matches watch (?v=), short-link, embed and shorts URLs, or a bare id.
    Regex::new(
        r"(?x)
        (?:v=|/|youtu\.be/|embed/|shorts/)
        ([0-9A-Za-z_-]{11})
        |
        ^([0-9A-Za-z_-]{11})$
    ",
    )
    .expect("video id regex is valid")
});

/// Canonical 11-character YouTube video id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the video id from any accepted URL shape or a bare id.
    ///
    /// Returns `None` when no 11-character token matches.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = VIDEO_ID_REGEX.captures(input.trim())?;

        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| VideoId(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full watch page URL.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }

    /// Bare short-link URL.
    pub fn short_url(&self) -> String {
        format!("https://youtu.be/{}", self.0)
    }

    /// Short-link URL that starts playback at `seconds`.
    pub fn timestamp_url(&self, seconds: u64) -> String {
        format!("https://youtu.be/{}?t={}s", self.0, seconds)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_url_shapes_yield_same_id() {
        let inputs = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&t=42s",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "  dQw4w9WgXcQ  ",
        ];

        for input in inputs {
            assert_eq!(
                VideoId::parse(input).map(|id| id.to_string()),
                Some("dQw4w9WgXcQ".to_string()),
                "failed for {}",
                input
            );
        }
    }

    #[test]
    fn test_malformed_input_yields_none() {
        assert_eq!(VideoId::parse(""), None);
        assert_eq!(VideoId::parse("not a url"), None);
        assert_eq!(VideoId::parse("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(VideoId::parse("https://youtu.be/"), None);
        assert_eq!(VideoId::parse("not-a-video-id"), None);
    }

    #[test]
    fn test_derived_urls() {
        let id = VideoId::parse("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id.short_url(), "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(id.timestamp_url(42), "https://youtu.be/dQw4w9WgXcQ?t=42s");
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
