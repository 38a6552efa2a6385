use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::providers::FetchError;

/// Stable error kinds reported in the `error_type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or unparsable `url` parameter
    ClientError,
    NoTranscript,
    Unavailable,
    SubtitlesDisabled,
    /// Upstream failure that matched no known message
    Unknown,
    /// Any failure while listing caption tracks
    LanguageFetchError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ClientError => "client_error",
            ErrorKind::NoTranscript => "no_transcript",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::SubtitlesDisabled => "subtitles_disabled",
            ErrorKind::Unknown => "unknown",
            ErrorKind::LanguageFetchError => "language_fetch_error",
        }
    }

    /// HTTP status reported alongside this kind
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::ClientError => StatusCode::BAD_REQUEST,
            ErrorKind::NoTranscript | ErrorKind::Unavailable | ErrorKind::SubtitlesDisabled => {
                StatusCode::NOT_FOUND
            }
            ErrorKind::Unknown | ErrorKind::LanguageFetchError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of classifying a transcript fetch failure
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub message: String,
}

/// Upstream message fragments, checked in order; the first hit decides the kind.
const MESSAGE_RULES: &[(&str, ErrorKind, &str)] = &[
    (
        "No transcripts were found",
        ErrorKind::NoTranscript,
        "No transcripts available for this video",
    ),
    (
        "Video unavailable",
        ErrorKind::Unavailable,
        "Video is unavailable or private",
    ),
    (
        "Subtitles are disabled",
        ErrorKind::SubtitlesDisabled,
        "Subtitles are disabled for this video",
    ),
];

/// Classify a transcript fetch failure by the text of its message.
///
/// YouTube only reports these failures as prose, so matching on substrings is the only
/// discriminator available. Unmatched messages are passed through as `unknown`.
pub fn classify_message(message: &str) -> Classification {
    MESSAGE_RULES
        .iter()
        .find(|(needle, _, _)| message.contains(needle))
        .map(|&(_, kind, text)| Classification {
            kind,
            status: kind.status_code(),
            message: text.to_string(),
        })
        .unwrap_or_else(|| Classification {
            kind: ErrorKind::Unknown,
            status: ErrorKind::Unknown.status_code(),
            message: message.to_string(),
        })
}

/// Classify a provider error by its rendered message
pub fn classify(err: &FetchError) -> Classification {
    classify_message(&err.to_string())
}
