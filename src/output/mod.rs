use serde::{Deserialize, Serialize};

use crate::transcript::{Classification, ErrorKind, TranscriptSegment};

pub mod formatters;

pub use formatters::*;

/// Output format of a transcript response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptFormat {
    /// Timestamped segments
    #[default]
    Json,
    /// Flattened plain text
    Text,
}

impl TranscriptFormat {
    /// Only the exact value `text` selects plain text; anything else falls back to JSON
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("text") => TranscriptFormat::Text,
            _ => TranscriptFormat::Json,
        }
    }
}

impl std::fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptFormat::Json => write!(f, "json"),
            TranscriptFormat::Text => write!(f, "text"),
        }
    }
}

/// Transcript with timestamps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonTranscript {
    pub success: bool,
    pub video_id: String,
    pub language: String,
    pub format: TranscriptFormat,
    pub transcript: Vec<TranscriptSegment>,
    pub word_count: usize,
    #[serde(serialize_with = "serialize_seconds")]
    pub duration_seconds: f64,
    pub segments_count: usize,
}

/// Transcript flattened to text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextTranscript {
    pub success: bool,
    pub video_id: String,
    pub language: String,
    pub format: TranscriptFormat,
    pub transcript: String,
    pub word_count: usize,
    #[serde(serialize_with = "serialize_seconds")]
    pub duration_seconds: f64,
}

/// Classified transcript failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptFailure {
    pub success: bool,
    pub error: String,
    pub error_type: ErrorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

impl TranscriptFailure {
    pub fn from_classification(classification: Classification, video_id: Option<String>) -> Self {
        Self {
            success: false,
            error: classification.message,
            error_type: classification.kind,
            video_id,
        }
    }
}

/// Body of a `/transcript` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptResponse {
    Json(JsonTranscript),
    Text(TextTranscript),
    Failure(TranscriptFailure),
}

impl TranscriptResponse {
    pub fn is_success(&self) -> bool {
        !matches!(self, TranscriptResponse::Failure(_))
    }
}

/// Build the success payload for a fetched transcript.
///
/// Both word counts are computed from their own source: the JSON count sums the
/// segments, the text count splits the flattened text.
pub fn format_transcript(
    segments: Vec<TranscriptSegment>,
    format: TranscriptFormat,
    video_id: &str,
    language: &str,
) -> TranscriptResponse {
    let duration_seconds = total_duration(&segments);

    match format {
        TranscriptFormat::Text => {
            let text = format_as_text(&segments);
            TranscriptResponse::Text(TextTranscript {
                success: true,
                video_id: video_id.to_string(),
                language: language.to_string(),
                format,
                word_count: count_words(&text),
                transcript: text,
                duration_seconds,
            })
        }
        TranscriptFormat::Json => TranscriptResponse::Json(JsonTranscript {
            success: true,
            video_id: video_id.to_string(),
            language: language.to_string(),
            format,
            word_count: count_segment_words(&segments),
            segments_count: segments.len(),
            transcript: segments,
            duration_seconds,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn hello_world() -> Vec<TranscriptSegment> {
        vec![
            TranscriptSegment::new("Hello", 0.0, 1.0),
            TranscriptSegment::new("world", 1.0, 1.0),
        ]
    }

    #[test]
    fn test_format_from_param() {
        assert_eq!(TranscriptFormat::from_param(Some("text")), TranscriptFormat::Text);
        assert_eq!(TranscriptFormat::from_param(Some("TEXT")), TranscriptFormat::Json);
        assert_eq!(TranscriptFormat::from_param(Some("srt")), TranscriptFormat::Json);
        assert_eq!(TranscriptFormat::from_param(None), TranscriptFormat::Json);
    }

    #[test]
    fn test_text_payload() {
        let response = format_transcript(hello_world(), TranscriptFormat::Text, "dQw4w9WgXcQ", "en");

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "video_id": "dQw4w9WgXcQ",
                "language": "en",
                "format": "text",
                "transcript": "Hello world",
                "word_count": 2,
                "duration_seconds": 2
            })
        );
    }

    #[test]
    fn test_json_payload() {
        let segments = vec![
            TranscriptSegment::new("one two", 0.5, 1.25),
            TranscriptSegment::new("three", 1.75, 2.0),
        ];
        let response = format_transcript(segments, TranscriptFormat::Json, "dQw4w9WgXcQ", "de");

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": true,
                "video_id": "dQw4w9WgXcQ",
                "language": "de",
                "format": "json",
                "transcript": [
                    {"text": "one two", "start": 0.5, "duration": 1.25},
                    {"text": "three", "start": 1.75, "duration": 2.0}
                ],
                "word_count": 3,
                "duration_seconds": 3.75,
                "segments_count": 2
            })
        );
    }

    #[test]
    fn test_empty_transcript() {
        match format_transcript(Vec::new(), TranscriptFormat::Json, "dQw4w9WgXcQ", "en") {
            TranscriptResponse::Json(payload) => {
                assert_eq!(payload.word_count, 0);
                assert_eq!(payload.segments_count, 0);
                assert_eq!(payload.duration_seconds, 0.0);
            }
            other => panic!("unexpected response: {:?}", other),
        }

        match format_transcript(Vec::new(), TranscriptFormat::Text, "dQw4w9WgXcQ", "en") {
            TranscriptResponse::Text(payload) => {
                assert_eq!(payload.transcript, "");
                assert_eq!(payload.word_count, 0);
                assert_eq!(payload.duration_seconds, 0.0);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_duration_uses_last_segment() {
        let segments = vec![
            TranscriptSegment::new("long", 0.0, 100.0),
            TranscriptSegment::new("short", 10.0, 2.5),
        ];

        match format_transcript(segments, TranscriptFormat::Json, "dQw4w9WgXcQ", "en") {
            TranscriptResponse::Json(payload) => assert_eq!(payload.duration_seconds, 12.5),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_failure_payload() {
        let classification = crate::transcript::classify_message("Video unavailable");
        let response = TranscriptResponse::Failure(TranscriptFailure::from_classification(
            classification,
            Some("dQw4w9WgXcQ".to_string()),
        ));

        assert!(!response.is_success());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": false,
                "error": "Video is unavailable or private",
                "error_type": "unavailable",
                "video_id": "dQw4w9WgXcQ"
            })
        );
    }
}
