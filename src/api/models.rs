//! API data models

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::transcript::{ErrorKind, LanguageDescriptor};

/// Query string of `GET /transcript`
#[derive(Debug, Default, PartialEq)]
pub struct TranscriptQuery {
    pub url: Option<String>,
    pub language: Option<String>,
    pub format: Option<String>,
}

impl TranscriptQuery {
    /// Parse a raw query string; repeated keys keep their first value
    pub fn parse(raw: Option<&str>) -> Self {
        let mut query = Self::default();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            let slot = match &*key {
                "url" => &mut query.url,
                "language" => &mut query.language,
                "format" => &mut query.format,
                _ => continue,
            };
            slot.get_or_insert_with(|| value.into_owned());
        }
        query
    }
}

/// Query string of `GET /transcript/languages`
#[derive(Debug, Default, PartialEq)]
pub struct LanguagesQuery {
    pub url: Option<String>,
}

impl LanguagesQuery {
    /// Parse a raw query string; a repeated `url` keeps its first value
    pub fn parse(raw: Option<&str>) -> Self {
        let url = form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
            .find(|(key, _)| key == "url")
            .map(|(_, value)| value.into_owned());
        Self { url }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Endpoints {
    pub transcript: String,
    pub languages: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "YouTube Transcript API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: Endpoints {
                transcript: "/transcript?url=YOUTUBE_URL".to_string(),
                languages: "/transcript/languages?url=YOUTUBE_URL".to_string(),
            },
        }
    }
}

/// Rejected request parameters
#[derive(Debug, Serialize, Deserialize)]
pub struct ClientErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provided_url: Option<String>,
}

impl ClientErrorResponse {
    pub fn missing_url(example: &str) -> Self {
        Self {
            success: false,
            error: "URL parameter is required".to_string(),
            example: Some(example.to_string()),
            provided_url: None,
        }
    }

    pub fn invalid_url(url: &str) -> Self {
        Self {
            success: false,
            error: "Invalid YouTube URL format".to_string(),
            example: None,
            provided_url: Some(url.to_string()),
        }
    }
}

/// Caption tracks available for a video
#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesResponse {
    pub success: bool,
    pub video_id: String,
    pub available_languages: Vec<LanguageDescriptor>,
    pub total_languages: usize,
}

impl LanguagesResponse {
    pub fn new(video_id: String, available_languages: Vec<LanguageDescriptor>) -> Self {
        Self {
            success: true,
            video_id,
            total_languages: available_languages.len(),
            available_languages,
        }
    }
}

/// Failure while listing caption tracks
#[derive(Debug, Serialize, Deserialize)]
pub struct LanguagesFailure {
    pub success: bool,
    pub error: String,
    pub error_type: ErrorKind,
}

impl LanguagesFailure {
    pub fn new(error: String) -> Self {
        Self {
            success: false,
            error,
            error_type: ErrorKind::LanguageFetchError,
        }
    }
}
