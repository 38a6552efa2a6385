use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::providers::{CaptionProvider, CaptionTrack, FetchError};

pub mod classifier;

pub use classifier::{classify, classify_message, Classification, ErrorKind};

/// Language every transcript request falls back to
pub const FALLBACK_LANGUAGE: &str = "en";

/// Individual transcript segment with timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment text
    pub text: String,

    /// Start offset in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    /// End offset in seconds
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// An available caption track as exposed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDescriptor {
    /// Human readable language name
    pub language: String,

    /// Language code, e.g. `en` or `pt-BR`
    pub language_code: String,

    /// Whether the track was generated by speech recognition
    pub is_generated: bool,

    /// Whether YouTube can translate the track
    pub is_translatable: bool,
}

impl From<CaptionTrack> for LanguageDescriptor {
    fn from(track: CaptionTrack) -> Self {
        Self {
            language: track.name,
            language_code: track.language_code,
            is_generated: track.is_generated,
            is_translatable: track.is_translatable,
        }
    }
}

/// Transcript fetching and language listing on top of a caption provider
pub struct TranscriptService {
    provider: Arc<dyn CaptionProvider>,
}

impl TranscriptService {
    pub fn new(provider: Arc<dyn CaptionProvider>) -> Self {
        Self { provider }
    }

    /// Fetch the transcript in the preferred language, falling back to English.
    ///
    /// Track negotiation is left to the provider; this only hands it the priority list.
    pub async fn fetch_transcript(
        &self,
        video_id: &str,
        preferred_language: &str,
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        let languages = language_priority(preferred_language);
        tracing::debug!(?languages, "Requesting transcript from provider");

        let segments = self.provider.fetch(video_id, &languages).await?;
        tracing::debug!(segments = segments.len(), "Provider returned transcript");

        Ok(segments)
    }

    /// List the caption tracks available for a video, in provider order
    pub async fn list_languages(&self, video_id: &str) -> Result<Vec<LanguageDescriptor>, FetchError> {
        let tracks = self.provider.list_tracks(video_id).await?;

        Ok(tracks.into_iter().map(LanguageDescriptor::from).collect())
    }
}

/// Requested language first, then English
pub fn language_priority(preferred_language: &str) -> Vec<String> {
    vec![preferred_language.to_string(), FALLBACK_LANGUAGE.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockCaptionProvider;

    fn track(code: &str, generated: bool) -> CaptionTrack {
        CaptionTrack {
            name: format!("Language {}", code),
            language_code: code.to_string(),
            is_generated: generated,
            is_translatable: !generated,
        }
    }

    #[test]
    fn test_language_priority() {
        assert_eq!(language_priority("de"), vec!["de".to_string(), "en".to_string()]);
        assert_eq!(language_priority("en"), vec!["en".to_string(), "en".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_passes_language_priority() {
        let mut provider = MockCaptionProvider::new();
        provider
            .expect_fetch()
            .withf(|video_id, languages| {
                video_id.to_string() == "dQw4w9WgXcQ"
                    && languages.to_vec() == vec!["es".to_string(), "en".to_string()]
            })
            .times(1)
            .returning(|_, _| Ok(vec![TranscriptSegment::new("hola", 0.0, 1.5)]));

        let service = TranscriptService::new(Arc::new(provider));
        let segments = service.fetch_transcript("dQw4w9WgXcQ", "es").await.unwrap();

        assert_eq!(segments, vec![TranscriptSegment::new("hola", 0.0, 1.5)]);
    }

    #[tokio::test]
    async fn test_fetch_surfaces_provider_error() {
        let mut provider = MockCaptionProvider::new();
        provider
            .expect_fetch()
            .times(1)
            .returning(|_, _| Err(FetchError::Upstream("connection reset".to_string())));

        let service = TranscriptService::new(Arc::new(provider));
        let err = service.fetch_transcript("dQw4w9WgXcQ", "en").await.unwrap_err();

        assert_eq!(err.to_string(), "connection reset");
    }

    #[test]
    fn test_list_languages_preserves_order() {
        let mut provider = MockCaptionProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Ok(vec![track("fr", false), track("en", true), track("de", false)]));

        let service = TranscriptService::new(Arc::new(provider));
        let languages = tokio_test::block_on(service.list_languages("dQw4w9WgXcQ")).unwrap();

        let codes: Vec<&str> = languages.iter().map(|l| l.language_code.as_str()).collect();
        assert_eq!(codes, vec!["fr", "en", "de"]);
        assert!(languages[1].is_generated);
        assert!(!languages[1].is_translatable);
        assert_eq!(languages[0].language, "Language fr");
    }

    #[test]
    fn test_list_languages_empty_is_not_an_error() {
        let mut provider = MockCaptionProvider::new();
        provider.expect_list_tracks().returning(|_| Ok(Vec::new()));

        let service = TranscriptService::new(Arc::new(provider));
        let languages = tokio_test::block_on(service.list_languages("dQw4w9WgXcQ")).unwrap();

        assert!(languages.is_empty());
    }
}
