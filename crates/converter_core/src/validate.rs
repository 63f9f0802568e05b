use std::sync::LazyLock;

use regex::RegexSet;

/// Accepted YouTube URL shapes. Each is anchored at the start only, so query
/// strings and extra parameters after the video id are allowed.
static YOUTUBE_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"^https?://(www\.)?youtube\.com/watch\?v=[A-Za-z0-9_-]+",
        r"^https?://(www\.)?youtube\.com/shorts/[A-Za-z0-9_-]+",
        r"^https?://youtu\.be/[A-Za-z0-9_-]+",
        r"^https?://(www\.)?youtube\.com/embed/[A-Za-z0-9_-]+",
        r"^https?://m\.youtube\.com/watch\?v=[A-Za-z0-9_-]+",
    ])
    .unwrap_or_else(|_| unreachable!("static patterns are valid"))
});

/// Returns true when `input` (after trimming) looks like a YouTube video URL.
pub fn is_valid_url(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty() && YOUTUBE_PATTERNS.is_match(trimmed)
}
