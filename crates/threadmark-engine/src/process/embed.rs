use std::sync::OnceLock;

use regex::Regex;

use super::lookups::EmbedInfo;

/// Embed type reported for YouTube videos.
pub const YOUTUBE_KIND: &str = "video/x-youtube";
/// Icon hint attached to links that resolve to a YouTube video.
pub const YOUTUBE_ICON: &str = "youtube";

fn youtube_regex() -> &'static Regex {
    static YOUTUBE_REGEX: OnceLock<Regex> = OnceLock::new();
    YOUTUBE_REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:https?://)?(?:www\.)?(?:youtube\.com|m\.youtube\.com|youtu\.be|youtube-nocookie\.com)/.+$",
        )
        .expect("Invalid YouTube regex")
    })
}

/// True for URLs served by YouTube or one of its short/mobile hosts.
pub fn is_youtube_url(url: &str) -> bool {
    youtube_regex().is_match(url)
}

/// Icon hint for a resolved embed, when its provider is recognized.
pub fn icon_for(embed: &EmbedInfo) -> Option<&'static str> {
    if embed.kind.eq_ignore_ascii_case(YOUTUBE_KIND) || is_youtube_url(&embed.url) {
        return Some(YOUTUBE_ICON);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn embed(kind: &str, url: &str) -> EmbedInfo {
        EmbedInfo {
            kind: kind.into(),
            name: "title".into(),
            url: url.into(),
            width: 0,
            height: 0,
            thumbnail_url: String::new(),
            thumbnail_width: 0,
            thumbnail_height: 0,
        }
    }

    #[rstest]
    #[case("https://www.youtube.com/watch?v=PEKkdIT8JPM", true)]
    #[case("https://m.youtube.com/watch?v=x", true)]
    #[case("https://youtu.be/PEKkdIT8JPM", true)]
    #[case("youtube-nocookie.com/embed/x", true)]
    #[case("https://youtube.com/", false)]
    #[case("https://notyoutube.com/watch", false)]
    #[case("https://vimeo.com/123", false)]
    fn youtube_urls(#[case] url: &str, #[case] expected: bool) {
        assert_eq!(is_youtube_url(url), expected);
    }

    #[test]
    fn icon_from_kind() {
        assert_eq!(
            icon_for(&embed(YOUTUBE_KIND, "https://example.com/v")),
            Some(YOUTUBE_ICON)
        );
    }

    #[test]
    fn icon_from_url() {
        assert_eq!(
            icon_for(&embed("video/mp4", "https://youtu.be/abc")),
            Some(YOUTUBE_ICON)
        );
    }

    #[test]
    fn unknown_provider_has_no_icon() {
        assert_eq!(icon_for(&embed("text/html", "https://example.com")), None);
    }
}
