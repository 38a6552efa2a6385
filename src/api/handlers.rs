//! API request handlers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tracing::Instrument;

use super::models::{
    ClientErrorResponse, HealthResponse, LanguagesFailure, LanguagesQuery, LanguagesResponse,
    TranscriptQuery,
};
use crate::extractors::extract_video_id;
use crate::output::{format_transcript, TranscriptFailure, TranscriptFormat, TranscriptResponse};
use crate::transcript::{classify, ErrorKind, TranscriptService};

const TRANSCRIPT_EXAMPLE: &str = "/transcript?url=https://www.youtube.com/watch?v=VIDEO_ID";
const LANGUAGES_EXAMPLE: &str = "/transcript/languages?url=https://www.youtube.com/watch?v=VIDEO_ID";

/// Handle health check requests
pub fn health_check() -> HealthResponse {
    HealthResponse::healthy()
}

/// Validate the `url` parameter and extract the video id, or build the 400 response
fn require_video_id(url: Option<&str>, example: &str) -> Result<String, Response> {
    let url = match url {
        Some(url) if !url.is_empty() => url,
        _ => {
            let body = ClientErrorResponse::missing_url(example);
            return Err((ErrorKind::ClientError.status_code(), Json(body)).into_response());
        }
    };

    extract_video_id(url).ok_or_else(|| {
        tracing::warn!("Rejected unparsable URL: {}", url);
        let body = ClientErrorResponse::invalid_url(url);
        (ErrorKind::ClientError.status_code(), Json(body)).into_response()
    })
}

/// Handle transcript requests
pub async fn get_transcript(
    service: &TranscriptService,
    query: TranscriptQuery,
    default_language: &str,
) -> Response {
    let video_id = match require_video_id(query.url.as_deref(), TRANSCRIPT_EXAMPLE) {
        Ok(video_id) => video_id,
        Err(response) => return response,
    };

    let language = query.language.unwrap_or_else(|| default_language.to_string());
    let format = TranscriptFormat::from_param(query.format.as_deref());

    let span = tracing::info_span!("transcript", video_id = %video_id, %language, %format);
    async move {
        tracing::info!("Fetching transcript");

        match service.fetch_transcript(&video_id, &language).await {
            Ok(segments) => {
                let response = format_transcript(segments, format, &video_id, &language);
                tracing::info!("Successfully fetched transcript");
                (StatusCode::OK, Json(response)).into_response()
            }
            Err(e) => {
                tracing::error!("Error fetching transcript: {}", e);
                let classification = classify(&e);
                let status = classification.status;
                let body = TranscriptResponse::Failure(TranscriptFailure::from_classification(
                    classification,
                    Some(video_id.clone()),
                ));
                (status, Json(body)).into_response()
            }
        }
    }
    .instrument(span)
    .await
}

/// Handle available language requests
pub async fn get_available_languages(service: &TranscriptService, query: LanguagesQuery) -> Response {
    let video_id = match require_video_id(query.url.as_deref(), LANGUAGES_EXAMPLE) {
        Ok(video_id) => video_id,
        Err(response) => return response,
    };

    let span = tracing::info_span!("languages", video_id = %video_id);
    async move {
        match service.list_languages(&video_id).await {
            Ok(languages) => {
                tracing::info!(total = languages.len(), "Listed available languages");
                (StatusCode::OK, Json(LanguagesResponse::new(video_id.clone(), languages)))
                    .into_response()
            }
            Err(e) => {
                tracing::error!("Error fetching available languages: {}", e);
                let kind = ErrorKind::LanguageFetchError;
                (kind.status_code(), Json(LanguagesFailure::new(e.to_string()))).into_response()
            }
        }
    }
    .instrument(span)
    .await
}
