use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod youtube;

pub use youtube::YoutubeCaptionProvider;

use crate::transcript::TranscriptSegment;

/// A caption track advertised by the provider for a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionTrack {
    /// Display name of the track language
    pub name: String,

    /// Language code of the track
    pub language_code: String,

    /// Generated by speech recognition rather than uploaded
    pub is_generated: bool,

    /// Whether the provider offers translations of this track
    pub is_translatable: bool,
}

/// Failures reported by a caption provider.
///
/// The rendered messages are what the error classifier inspects, so the wording of the
/// first three variants is part of the API contract.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("No transcripts were found for any of the requested language codes {requested:?} (video {video_id}, available: {available:?})")]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("Video unavailable: {video_id}")]
    VideoUnavailable { video_id: String },

    #[error("Subtitles are disabled for this video ({video_id})")]
    TranscriptsDisabled { video_id: String },

    #[error("Video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("YouTube is blocking requests for video {video_id} from this IP address")]
    RequestBlocked { video_id: String },

    #[error("Unexpected response from YouTube: {0}")]
    InvalidResponse(String),

    #[error("Request to YouTube failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A provider failure carried only as text
    #[error("{0}")]
    Upstream(String),
}

/// Capabilities consumed from the upstream captioning service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Fetch the transcript of the first available language in `languages`
    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>, FetchError>;

    /// List every caption track the video offers
    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, FetchError>;

    /// Get the name of this provider
    fn provider_name(&self) -> &'static str;
}
