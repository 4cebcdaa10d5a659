/// Transcript types and acquisition
///
/// Raw caption cues arrive in whatever unit the caption endpoint chose to
/// report; everything past this module speaks canonical seconds.

pub mod normalize;
pub mod youtube;

// Re-export main types
pub use normalize::{normalize_segment, normalize_segments};
pub use youtube::YouTubeTranscriptFetcher;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A timestamped span of transcript text, in canonical seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    /// Transcribed text
    pub text: String,
    /// Start time in seconds
    pub start_seconds: f64,
    /// End time in seconds
    pub end_seconds: f64,
}

impl TranscriptSegment {
    pub fn new(text: impl Into<String>, start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            text: text.into(),
            start_seconds,
            end_seconds,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }
}

/// Time unit of raw caption data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

/// Unnormalized caption cue as returned by a caption endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct RawTranscriptSegment {
    /// Cue text
    pub text: String,
    /// Offset from video start, in `unit`
    pub offset: f64,
    /// Cue duration, in `unit`
    pub duration: f64,
    /// Unit the endpoint reported times in
    pub unit: TimeUnit,
}

impl RawTranscriptSegment {
    pub fn new(text: impl Into<String>, offset: f64, duration: f64, unit: TimeUnit) -> Self {
        Self {
            text: text.into(),
            offset,
            duration,
            unit,
        }
    }
}

/// Source of transcript segments for a video
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch ordered transcript segments; empty when the video has no captions.
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptSegment>>;
}
