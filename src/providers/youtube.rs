use anyhow::Context;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{CaptionProvider, CaptionTrack, FetchError};
use crate::config::UpstreamConfig;
use crate::transcript::TranscriptSegment;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

lazy_static! {
    static ref API_KEY_RE: Regex =
        Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap();
}

/// YouTube caption provider talking to the watch page and the InnerTube player API
pub struct YoutubeCaptionProvider {
    client: reqwest::Client,
}

impl YoutubeCaptionProvider {
    /// Build a provider whose requests look like they come from a desktop browser.
    ///
    /// `Accept-Encoding` is negotiated by reqwest itself (gzip, brotli).
    pub fn new(config: &UpstreamConfig) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)
                .context("Invalid upstream accept_language header")?,
        );

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Resolve the caption tracks of a video
    async fn load_tracks(&self, video_id: &str) -> Result<Vec<YoutubeTrack>, FetchError> {
        let html = self.fetch_video_html(video_id).await?;
        let api_key = extract_api_key(&html, video_id)?;
        let player = self.fetch_player_response(video_id, &api_key).await?;

        caption_tracks(player, video_id)
    }

    async fn fetch_video_html(&self, video_id: &str) -> Result<String, FetchError> {
        tracing::debug!("Loading watch page for: {}", video_id);

        let response = self
            .client
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .send()
            .await?;

        Ok(check_status(response, video_id)?.text().await?)
    }

    async fn fetch_player_response(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<PlayerResponse, FetchError> {
        tracing::debug!("Requesting InnerTube player response for: {}", video_id);

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(INNERTUBE_PLAYER_URL)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        Ok(check_status(response, video_id)?.json::<PlayerResponse>().await?)
    }

    async fn fetch_timedtext(
        &self,
        video_id: &str,
        base_url: &str,
    ) -> Result<String, FetchError> {
        let url = timedtext_url(base_url)?;
        let response = self.client.get(url).send().await?;
        let xml = check_status(response, video_id)?.text().await?;

        if xml.trim().is_empty() {
            return Err(FetchError::InvalidResponse(format!(
                "empty caption document for video {}",
                video_id
            )));
        }

        Ok(xml)
    }
}

#[async_trait]
impl CaptionProvider for YoutubeCaptionProvider {
    async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<Vec<TranscriptSegment>, FetchError> {
        let tracks = self.load_tracks(video_id).await?;

        let track = select_track(&tracks, languages).ok_or_else(|| FetchError::NoTranscriptFound {
            video_id: video_id.to_string(),
            requested: languages.to_vec(),
            available: tracks
                .iter()
                .map(|t| t.track.language_code.clone())
                .collect(),
        })?;

        tracing::info!(
            language = %track.track.language_code,
            generated = track.track.is_generated,
            "Selected caption track"
        );

        let xml = self.fetch_timedtext(video_id, &track.base_url).await?;
        parse_timedtext(&xml)
    }

    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>, FetchError> {
        let tracks = self.load_tracks(video_id).await?;

        Ok(tracks.into_iter().map(|t| t.track).collect())
    }

    fn provider_name(&self) -> &'static str {
        "YouTube"
    }
}

/// Subset of the InnerTube player response we rely on
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    #[serde(default)]
    playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    #[serde(default)]
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<RawCaptionTrack>,
    #[serde(default)]
    translation_languages: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCaptionTrack {
    base_url: String,
    #[serde(default)]
    name: TrackName,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    is_translatable: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn display(self) -> String {
        self.simple_text
            .unwrap_or_else(|| self.runs.into_iter().map(|run| run.text).collect())
    }
}

/// Caption track together with the URL its captions are served from
#[derive(Debug, Clone)]
struct YoutubeTrack {
    track: CaptionTrack,
    base_url: String,
}

fn check_status(
    response: reqwest::Response,
    video_id: &str,
) -> Result<reqwest::Response, FetchError> {
    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RequestBlocked {
            video_id: video_id.to_string(),
        });
    }

    Ok(response.error_for_status()?)
}

fn extract_api_key(html: &str, video_id: &str) -> Result<String, FetchError> {
    if let Some(caps) = API_KEY_RE.captures(html) {
        return Ok(caps[1].to_string());
    }

    if html.contains("class=\"g-recaptcha\"") {
        return Err(FetchError::RequestBlocked {
            video_id: video_id.to_string(),
        });
    }

    Err(FetchError::InvalidResponse(format!(
        "no InnerTube API key on the watch page of video {}",
        video_id
    )))
}

fn check_playability(
    status: &PlayabilityStatus,
    video_id: &str,
) -> Result<(), FetchError> {
    let reason = status.reason.as_deref().unwrap_or_default();

    match status.status.as_str() {
        "OK" | "" => Ok(()),
        "LOGIN_REQUIRED" if reason.starts_with("Sign in to confirm you") => {
            Err(FetchError::RequestBlocked {
                video_id: video_id.to_string(),
            })
        }
        "ERROR" if reason == "This video is unavailable" => Err(FetchError::VideoUnavailable {
            video_id: video_id.to_string(),
        }),
        other => Err(FetchError::VideoUnplayable {
            video_id: video_id.to_string(),
            reason: if reason.is_empty() {
                other.to_string()
            } else {
                reason.to_string()
            },
        }),
    }
}

fn caption_tracks(
    player: PlayerResponse,
    video_id: &str,
) -> Result<Vec<YoutubeTrack>, FetchError> {
    if let Some(status) = &player.playability_status {
        check_playability(status, video_id)?;
    }

    let disabled = || FetchError::TranscriptsDisabled {
        video_id: video_id.to_string(),
    };

    let renderer = player
        .captions
        .and_then(|captions| captions.player_captions_tracklist_renderer)
        .ok_or_else(disabled)?;

    if renderer.caption_tracks.is_empty() {
        return Err(disabled());
    }

    let has_translations = !renderer.translation_languages.is_empty();

    let mut tracks: Vec<YoutubeTrack> = renderer
        .caption_tracks
        .into_iter()
        .map(|raw| YoutubeTrack {
            track: CaptionTrack {
                name: raw.name.display(),
                language_code: raw.language_code,
                is_generated: raw.kind.as_deref() == Some("asr"),
                is_translatable: raw.is_translatable && has_translations,
            },
            base_url: raw.base_url,
        })
        .collect();

    // Uploaded tracks are listed before generated ones, each group in player order
    tracks.sort_by_key(|t| t.track.is_generated);

    Ok(tracks)
}

/// Pick the first requested language that has a track, preferring uploaded tracks over
/// generated ones for the same language.
fn select_track<'a>(tracks: &'a [YoutubeTrack], languages: &[String]) -> Option<&'a YoutubeTrack> {
    languages.iter().find_map(|code| {
        tracks
            .iter()
            .filter(|t| t.track.language_code == *code)
            .min_by_key(|t| t.track.is_generated)
    })
}

/// Caption URL with the `fmt` parameter removed so YouTube serves the plain timedtext format
fn timedtext_url(base_url: &str) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| FetchError::InvalidResponse(format!("bad caption URL {}: {}", base_url, e)))?;

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut().clear().extend_pairs(&pairs);

    Ok(url)
}

/// Parse a timedtext document (`<text start=".." dur="..">..</text>` elements)
fn parse_timedtext(xml: &str) -> Result<Vec<TranscriptSegment>, FetchError> {
    let selector = Selector::parse("text")
        .map_err(|e| FetchError::InvalidResponse(format!("caption selector: {:?}", e)))?;

    let document = Html::parse_fragment(xml);
    let segments = document
        .select(&selector)
        .filter_map(|element| {
            let text = strip_markup(&element.text().collect::<String>());
            if text.is_empty() {
                return None;
            }

            let start = seconds_attr(element.value().attr("start"));
            let duration = seconds_attr(element.value().attr("dur"));
            Some(TranscriptSegment::new(text, start, duration))
        })
        .collect();

    Ok(segments)
}

/// Caption text is entity-escaped twice; this undoes the second level and drops
/// formatting tags such as `<i>`.
fn strip_markup(text: &str) -> String {
    Html::parse_fragment(text).root_element().text().collect()
}

fn seconds_attr(value: Option<&str>) -> f64 {
    value.and_then(|v| v.parse().ok()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIDEO_ID: &str = "dQw4w9WgXcQ";

    fn player(json: &str) -> PlayerResponse {
        serde_json::from_str(json).unwrap()
    }

    fn tracks(json: &str) -> Vec<YoutubeTrack> {
        caption_tracks(player(json), VIDEO_ID).unwrap()
    }

    const PLAYER_JSON: &str = r#"{
        "playabilityStatus": {"status": "OK"},
        "captions": {
            "playerCaptionsTracklistRenderer": {
                "captionTracks": [
                    {"baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=en&kind=asr&fmt=srv3", "name": {"runs": [{"text": "English (auto-generated)"}]}, "languageCode": "en", "kind": "asr", "isTranslatable": true},
                    {"baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=de", "name": {"simpleText": "German"}, "languageCode": "de", "isTranslatable": true},
                    {"baseUrl": "https://www.youtube.com/api/timedtext?v=x&lang=en", "name": {"simpleText": "English"}, "languageCode": "en"}
                ],
                "translationLanguages": [{"languageCode": "fr"}]
            }
        }
    }"#;

    #[test]
    fn test_caption_tracks() {
        let tracks = tracks(PLAYER_JSON);

        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].track.name, "German");
        assert!(!tracks[0].track.is_generated);
        assert_eq!(tracks[1].track.name, "English");
        assert!(!tracks[1].track.is_translatable);
        assert_eq!(tracks[2].track.name, "English (auto-generated)");
        assert!(tracks[2].track.is_generated);
        assert!(tracks[2].track.is_translatable);
    }

    #[test]
    fn test_select_track_prefers_manual_then_fallback() {
        let tracks = tracks(PLAYER_JSON);

        let en = select_track(&tracks, &["en".to_string()]).unwrap();
        assert_eq!(en.track.name, "English");
        assert!(!en.track.is_generated);

        let de = select_track(&tracks, &["de".to_string(), "en".to_string()]).unwrap();
        assert_eq!(de.track.language_code, "de");

        let fallback = select_track(&tracks, &["ja".to_string(), "en".to_string()]).unwrap();
        assert_eq!(fallback.track.name, "English");

        assert!(select_track(&tracks, &["ja".to_string()]).is_none());
    }

    #[test]
    fn test_missing_captions_means_disabled() {
        let err = caption_tracks(player(r#"{"playabilityStatus": {"status": "OK"}}"#), VIDEO_ID)
            .unwrap_err();
        assert!(matches!(err, FetchError::TranscriptsDisabled { .. }));

        let err = caption_tracks(
            player(r#"{"captions": {"playerCaptionsTracklistRenderer": {"captionTracks": []}}}"#),
            VIDEO_ID,
        )
        .unwrap_err();
        assert!(matches!(err, FetchError::TranscriptsDisabled { .. }));
    }

    #[test]
    fn test_playability_errors() {
        let unavailable = player(
            r#"{"playabilityStatus": {"status": "ERROR", "reason": "This video is unavailable"}}"#,
        );
        assert!(matches!(
            caption_tracks(unavailable, VIDEO_ID).unwrap_err(),
            FetchError::VideoUnavailable { .. }
        ));

        let bot_check = player(
            r#"{"playabilityStatus": {"status": "LOGIN_REQUIRED", "reason": "Sign in to confirm you're not a bot"}}"#,
        );
        assert!(matches!(
            caption_tracks(bot_check, VIDEO_ID).unwrap_err(),
            FetchError::RequestBlocked { .. }
        ));

        let private = player(
            r#"{"playabilityStatus": {"status": "LOGIN_REQUIRED", "reason": "This video is private"}}"#,
        );
        match caption_tracks(private, VIDEO_ID).unwrap_err() {
            FetchError::VideoUnplayable { reason, .. } => assert_eq!(reason, "This video is private"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_extract_api_key() {
        let html = r#"<script>ytcfg.set({"INNERTUBE_API_KEY": "AIzaSyA-test_key","OTHER":1});</script>"#;
        assert_eq!(extract_api_key(html, VIDEO_ID).unwrap(), "AIzaSyA-test_key");

        let captcha = r#"<div class="g-recaptcha" data-sitekey="x"></div>"#;
        assert!(matches!(
            extract_api_key(captcha, VIDEO_ID).unwrap_err(),
            FetchError::RequestBlocked { .. }
        ));

        assert!(matches!(
            extract_api_key("<html></html>", VIDEO_ID).unwrap_err(),
            FetchError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_timedtext_url_drops_format() {
        let url = timedtext_url("https://www.youtube.com/api/timedtext?v=x&lang=en&fmt=srv3&kind=asr")
            .unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/api/timedtext?v=x&lang=en&kind=asr");
    }

    #[test]
    fn test_parse_timedtext() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0" dur="1.54">Hey there</text><text start="1.54" dur="4.16">I&amp;#39;m &lt;i&gt;here&lt;/i&gt;</text><text start="5.7" dur="1"></text><text start="6.5" dur="2.5">Tom &amp;amp; Jerry</text></transcript>"#;

        let segments = parse_timedtext(xml).unwrap();

        assert_eq!(
            segments,
            vec![
                TranscriptSegment::new("Hey there", 0.0, 1.54),
                TranscriptSegment::new("I'm here", 1.54, 4.16),
                TranscriptSegment::new("Tom & Jerry", 6.5, 2.5),
            ]
        );
    }
}
