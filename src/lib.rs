//! Transcript API - An HTTP service for fetching YouTube transcripts
//!
//! This library turns a free-form YouTube URL into a video id, fetches the caption track
//! from YouTube with a language fallback, and renders it either as timestamped JSON
//! segments or as flattened plain text.

pub mod api;
pub mod cli;
pub mod config;
pub mod extractors;
pub mod output;
pub mod providers;
pub mod transcript;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use extractors::extract_video_id;
pub use output::{TranscriptFormat, TranscriptResponse};
pub use providers::{CaptionProvider, CaptionTrack, FetchError};
pub use transcript::{LanguageDescriptor, TranscriptSegment, TranscriptService};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the transcript service
#[derive(thiserror::Error, Debug)]
pub enum TranscriptApiError {
    #[error("Invalid YouTube URL format: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Transcript fetch failed: {0}")]
    FetchFailed(#[from] FetchError),
}
