/// Chapter types and acquisition
///
/// Chapters come from timestamp lines in the video description. The alignment
/// core only ever sees the typed, ordered list produced by this module.

pub mod parser;
pub mod fetcher;

// Re-export main types
pub use parser::ChapterParser;
pub use fetcher::YouTubeChapterFetcher;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Upper bound of a chapter interval.
///
/// The final chapter of a video usually has no explicit end. That case is a
/// dedicated variant so no arithmetic ever runs on a sentinel number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum ChapterEnd {
    /// Ends at the given time in seconds
    At(f64),
    /// Open-ended final chapter
    Unbounded,
}

impl ChapterEnd {
    /// Bounded end time in seconds, if any
    pub fn seconds(&self) -> Option<f64> {
        match self {
            ChapterEnd::At(end) => Some(*end),
            ChapterEnd::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, ChapterEnd::Unbounded)
    }

    /// Widens a bounded end by `offset` seconds; an unbounded end stays unbounded.
    pub fn extended_by(self, offset: f64) -> ChapterEnd {
        match self {
            ChapterEnd::At(end) => ChapterEnd::At(end + offset),
            ChapterEnd::Unbounded => ChapterEnd::Unbounded,
        }
    }

    /// True when `position` lies below this end (half-open upper bound).
    /// An unbounded end admits every position.
    pub fn admits(&self, position: f64) -> bool {
        match self {
            ChapterEnd::At(end) => position < *end,
            ChapterEnd::Unbounded => true,
        }
    }

    /// Bounded end, or `start + estimate` for an open-ended chapter.
    pub fn or_estimate(&self, start: f64, estimate: f64) -> f64 {
        match self {
            ChapterEnd::At(end) => *end,
            ChapterEnd::Unbounded => start + estimate,
        }
    }
}

impl From<Option<f64>> for ChapterEnd {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(end) => ChapterEnd::At(end),
            None => ChapterEnd::Unbounded,
        }
    }
}

impl From<ChapterEnd> for Option<f64> {
    fn from(value: ChapterEnd) -> Self {
        value.seconds()
    }
}

/// A named time interval within a video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter title
    pub title: String,
    /// Start time in seconds from video start
    pub start_time: f64,
    /// End time in seconds, unbounded for the open-ended final chapter
    pub end_time: ChapterEnd,
}

impl Chapter {
    pub fn new(title: impl Into<String>, start_time: f64, end_time: ChapterEnd) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time,
        }
    }

    /// Chapter with a known end time
    pub fn bounded(title: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self::new(title, start_time, ChapterEnd::At(end_time))
    }

    /// Chapter running from `start_time` to the end of the video
    pub fn open_ended(title: impl Into<String>, start_time: f64) -> Self {
        Self::new(title, start_time, ChapterEnd::Unbounded)
    }
}

/// Source of chapter markers for a video
#[async_trait]
pub trait ChapterSource: Send + Sync {
    /// Fetch ordered chapter markers; empty when the video has none.
    async fn fetch_chapters(&self, video_id: &str) -> Result<Vec<Chapter>>;
}
