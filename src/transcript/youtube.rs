//! YouTube caption fetcher
//!
//! Caption tracks are advertised inside the watch page's player-response
//! JSON. The track endpoint speaks two formats: json3 (millisecond offsets)
//! and legacy timedtext XML (second offsets). Both are handed to the
//! normalizer with their unit tag; nothing downstream sees raw units.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    normalize_segments, RawTranscriptSegment, TimeUnit, TranscriptSegment, TranscriptSource,
};
use crate::config::FetchConfig;

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Fetches transcript segments from YouTube caption tracks
#[derive(Debug, Clone)]
pub struct YouTubeTranscriptFetcher {
    client: Client,
    language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: Option<String>,
    /// "asr" marks auto-generated tracks
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Json3Body {
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs")]
    t_start_ms: Option<f64>,
    #[serde(rename = "dDurationMs")]
    d_duration_ms: Option<f64>,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    utf8: String,
}

impl YouTubeTranscriptFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            language: config.language.clone(),
        }
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String> {
        let url = format!("{}?v={}", WATCH_URL, urlencoding::encode(video_id));
        debug!("Fetching watch page: {}", url);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "watch page request for {} failed with {}",
                video_id,
                response.status()
            ));
        }

        Ok(response.text().await?)
    }

    fn extract_caption_tracks(html: &str) -> Vec<CaptionTrack> {
        let pattern = Regex::new(r#""captionTracks":(\[.*?\])"#)
            .expect("caption track pattern is valid");

        pattern
            .captures(html)
            .and_then(|caps| caps.get(1))
            .and_then(|raw| {
                // The embedded JSON escapes ampersands in URLs.
                let unescaped = raw.as_str().replace("\\u0026", "&");
                serde_json::from_str::<Vec<CaptionTrack>>(&unescaped).ok()
            })
            .unwrap_or_default()
    }

    /// Prefer a manual track in the configured language, then any track in
    /// that language, then whatever the page offers first.
    fn pick_track(tracks: &[CaptionTrack], language: Option<&str>) -> Option<CaptionTrack> {
        if let Some(language) = language {
            let in_language: Vec<&CaptionTrack> = tracks
                .iter()
                .filter(|track| track.language_code.as_deref() == Some(language))
                .collect();

            if let Some(manual) = in_language
                .iter()
                .find(|track| track.kind.as_deref() != Some("asr"))
            {
                return Some((*manual).clone());
            }
            if let Some(track) = in_language.first() {
                return Some((*track).clone());
            }
        }

        tracks.first().cloned()
    }

    async fn fetch_cues(&self, base_url: &str) -> Result<Vec<RawTranscriptSegment>> {
        // json3 first: structured, millisecond-denominated.
        let json_url = format!("{}&fmt=json3", base_url);
        let body = self.client.get(&json_url).send().await?.text().await?;
        if let Some(cues) = Self::parse_json3(&body) {
            return Ok(cues);
        }

        // Legacy timedtext XML fallback, second-denominated.
        debug!("json3 parse failed, falling back to timedtext XML");
        let body = self.client.get(base_url).send().await?.text().await?;
        Ok(Self::parse_timedtext_xml(&body))
    }

    fn parse_json3(body: &str) -> Option<Vec<RawTranscriptSegment>> {
        let parsed: Json3Body = serde_json::from_str(body).ok()?;

        let cues = parsed
            .events
            .into_iter()
            .filter_map(|event| {
                let start = event.t_start_ms?;
                let duration = event.d_duration_ms.unwrap_or(0.0);
                let text = event
                    .segs?
                    .into_iter()
                    .map(|seg| seg.utf8)
                    .collect::<String>()
                    .trim()
                    .to_string();
                if text.is_empty() {
                    return None;
                }
                Some(RawTranscriptSegment::new(
                    text,
                    start,
                    duration,
                    TimeUnit::Milliseconds,
                ))
            })
            .collect();

        Some(cues)
    }

    fn parse_timedtext_xml(body: &str) -> Vec<RawTranscriptSegment> {
        let pattern = Regex::new(r#"(?s)<text start="([\d.]+)" dur="([\d.]+)"[^>]*>(.*?)</text>"#)
            .expect("timedtext pattern is valid");

        pattern
            .captures_iter(body)
            .filter_map(|caps| {
                let start: f64 = caps.get(1)?.as_str().parse().ok()?;
                let duration: f64 = caps.get(2)?.as_str().parse().ok()?;
                let text = Self::decode_entities(caps.get(3)?.as_str());
                let text = text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(RawTranscriptSegment::new(
                    text,
                    start,
                    duration,
                    TimeUnit::Seconds,
                ))
            })
            .collect()
    }

    fn decode_entities(text: &str) -> String {
        let numeric = Regex::new(r"&#(\d+);").expect("numeric entity pattern is valid");
        let decoded = numeric.replace_all(text, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        });

        decoded
            .replace("&amp;", "&")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptFetcher {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>> {
        let html = self.fetch_watch_page(video_id).await?;

        let tracks = Self::extract_caption_tracks(&html);
        let track = match Self::pick_track(&tracks, self.language.as_deref()) {
            Some(track) => track,
            None => {
                warn!("⚠️ No caption tracks available for {}", video_id);
                return Ok(Vec::new());
            }
        };

        let cues = self.fetch_cues(&track.base_url).await?;
        let segments = normalize_segments(cues);
        info!(
            "🎤 Fetched {} transcript segments for {}",
            segments.len(),
            video_id
        );

        Ok(segments)
    }
}
