use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Video id patterns in priority order; the first pattern that matches anywhere in the
    /// input wins, even if a later pattern would match earlier in the string.
    static ref VIDEO_ID_PATTERNS: Vec<IdPattern> = vec![
        IdPattern::new("path-or-param", r"(?:v=|/)([0-9A-Za-z_-]{11})"),
        IdPattern::new("embed", r"(?:embed/)([0-9A-Za-z_-]{11})"),
        IdPattern::new("watch", r"(?:watch\?v=)([0-9A-Za-z_-]{11})"),
        IdPattern::new("short-link", r"(?:youtu\.be/)([0-9A-Za-z_-]{11})"),
        IdPattern::new("shorts", r"(?:youtube\.com/shorts/)([0-9A-Za-z_-]{11})"),
    ];
}

/// A named video id pattern with a single capture group
struct IdPattern {
    name: &'static str,
    regex: Regex,
}

impl IdPattern {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("video id pattern must compile"),
        }
    }

    fn capture<'a>(&self, url: &'a str) -> Option<&'a str> {
        self.regex
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Extract the 11-character video id from the various YouTube URL formats.
///
/// Returns `None` for empty input or when no pattern matches.
pub fn extract_video_id(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    VIDEO_ID_PATTERNS.iter().find_map(|pattern| {
        let id = pattern.capture(url)?;
        tracing::trace!(pattern = pattern.name, video_id = id, "Matched video id pattern");
        Some(id.to_string())
    })
}
