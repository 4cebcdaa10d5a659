/// Transcript-to-chapter alignment core
///
/// Given a time-ordered transcript and independently derived chapter markers,
/// partition the transcript text into per-chapter content blocks. Pure,
/// synchronous computation over in-memory data: the aligner performs no I/O,
/// never logs, and is referentially transparent for identical inputs and
/// configuration.

pub mod assemble;
pub mod assign;
pub mod filter;
pub mod window;

// Re-export main types
pub use filter::ContentFilter;
pub use window::AdjustedChapter;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chapters::{Chapter, ChapterEnd};
use crate::config::{AlignmentConfig, FilterConfig};
use crate::transcript::TranscriptSegment;

/// Fixed length estimate for an open-ended final chapter, in seconds
pub const UNBOUNDED_CHAPTER_ESTIMATE_SECONDS: f64 = 300.0;

/// When the transcript clock covers less than this fraction of the estimated
/// video duration, the two time bases are treated as incompatible and segments
/// are remapped proportionally.
pub const SCALE_MISMATCH_RATIO: f64 = 0.1;

/// Title substituted when filtering removes every chapter
pub const FALLBACK_CHAPTER_TITLE: &str = "Full Video";

/// Errors raised for violated preconditions. Malformed-but-well-typed input
/// (gaps, overlaps, empty lists) is handled by policy, not by errors.
#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Alignment policy selection.
///
/// Two historical policies exist for the same mapping problem; callers pick
/// one explicitly rather than relying on implicit defaults scattered through
/// the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AlignmentStrategy {
    /// Widen every chapter window symmetrically by the overlap margin. A
    /// segment near a cut boundary lands in both neighboring chapters, which
    /// keeps context intact across the cut.
    #[default]
    OverlapWindow,
    /// Legacy mapping: pull chapter starts back by a fixed offset, assign each
    /// segment to the first containing chapter, and fall back to positional
    /// rules for segments that match nothing.
    SingleAssignment,
}

impl AlignmentStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlignmentStrategy::OverlapWindow => "overlap-window",
            AlignmentStrategy::SingleAssignment => "single-assignment",
        }
    }
}

impl std::str::FromStr for AlignmentStrategy {
    type Err = AlignmentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "overlap-window" => Ok(AlignmentStrategy::OverlapWindow),
            "single-assignment" => Ok(AlignmentStrategy::SingleAssignment),
            other => Err(AlignmentError::InvalidInput(format!(
                "unknown alignment strategy: {other}"
            ))),
        }
    }
}

/// A transcript segment placed inside a chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedSegment {
    /// Segment text
    pub text: String,
    /// Original transcript offset in seconds
    pub offset: f64,
    /// Segment duration in seconds
    pub duration: f64,
    /// Normalized position within the chapter window, clamped to [0, 1]
    pub relative_position: f64,
}

/// Per-chapter content block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContent {
    /// Chapter title
    pub title: String,
    /// Start of the chapter window the segments were matched against
    pub start_time: f64,
    /// End of the chapter window, unbounded for the final chapter
    pub end_time: ChapterEnd,
    /// Space-joined, trimmed, time-ordered segment text
    pub content: String,
    /// Assigned segments in ascending start order
    pub segments: Vec<AssignedSegment>,
}

/// Aggregate metadata for one alignment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    /// Nominal video duration derived from the last chapter
    pub total_duration: f64,
    /// Number of chapters in the result
    pub chapter_count: usize,
    /// Number of transcript segments that entered assignment
    pub transcript_item_count: usize,
    /// Overlap margin echoed from configuration
    pub overlap_offset_seconds: f64,
}

impl ResultMetadata {
    fn zeroed() -> Self {
        Self {
            total_duration: 0.0,
            chapter_count: 0,
            transcript_item_count: 0,
            overlap_offset_seconds: 0.0,
        }
    }
}

/// Complete alignment output for one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedResult {
    pub video_id: String,
    pub metadata: ResultMetadata,
    pub chapters: Vec<ChapterContent>,
}

impl CombinedResult {
    /// Degenerate result for empty input. Not an error: a video without
    /// captions or chapters is an ordinary condition.
    pub fn empty(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            metadata: ResultMetadata::zeroed(),
            chapters: Vec::new(),
        }
    }
}

/// Chapter aligner: normalizer-fed segments in, per-chapter content out.
///
/// Pipeline: filter -> window adjustment -> assignment -> assembly.
#[derive(Debug, Clone)]
pub struct ChapterAligner {
    alignment: AlignmentConfig,
    filter: FilterConfig,
}

impl ChapterAligner {
    pub fn new(alignment: AlignmentConfig, filter: FilterConfig) -> Self {
        Self { alignment, filter }
    }

    /// Aligner using the crate-wide configuration
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.alignment.clone(), config.filter.clone())
    }

    pub fn strategy(&self) -> AlignmentStrategy {
        self.alignment.strategy
    }

    /// Align `segments` against `chapters` and assemble per-chapter content.
    ///
    /// Input order is not trusted: both lists are sorted by start time before
    /// assignment. Empty input produces an empty result, never an error.
    pub fn align(
        &self,
        video_id: &str,
        segments: &[TranscriptSegment],
        chapters: &[Chapter],
    ) -> Result<CombinedResult, AlignmentError> {
        self.validate(segments, chapters)?;

        if segments.is_empty() || chapters.is_empty() {
            return Ok(CombinedResult::empty(video_id));
        }

        let content_filter = ContentFilter::new(&self.filter.denylist);

        let mut segments: Vec<TranscriptSegment> = if self.filter.enable_transcript_filtering {
            content_filter.retain_segments(segments)
        } else {
            segments.to_vec()
        };

        let mut chapters: Vec<Chapter> = if self.filter.enable_chapter_filtering {
            content_filter.retain_chapters(chapters)
        } else {
            chapters.to_vec()
        };

        // Filtering may remove every chapter; the whole video then becomes
        // one fallback chapter. A fully filtered transcript still yields the
        // chapter skeleton, just with empty content.
        if chapters.is_empty() {
            chapters.push(Chapter::open_ended(FALLBACK_CHAPTER_TITLE, 0.0));
        }

        segments.sort_by(|a, b| {
            a.start_seconds
                .partial_cmp(&b.start_seconds)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        chapters.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let windows = match self.alignment.strategy {
            AlignmentStrategy::OverlapWindow => {
                window::widen_chapter_windows(&chapters, self.alignment.overlap_offset_seconds)
            }
            AlignmentStrategy::SingleAssignment => {
                window::pull_back_chapter_starts(&chapters, self.alignment.chapter_offset_seconds)
            }
        };

        let assigned = assign::assign_segments(&segments, &windows, self.alignment.strategy);
        let chapter_contents = assemble::assemble_chapters(&windows, assigned);
        let metadata = assemble::build_metadata(
            &chapters,
            segments.len(),
            self.alignment.overlap_offset_seconds,
        );

        Ok(CombinedResult {
            video_id: video_id.to_string(),
            metadata,
            chapters: chapter_contents,
        })
    }

    fn validate(
        &self,
        segments: &[TranscriptSegment],
        chapters: &[Chapter],
    ) -> Result<(), AlignmentError> {
        if !self.alignment.overlap_offset_seconds.is_finite()
            || self.alignment.overlap_offset_seconds < 0.0
        {
            return Err(AlignmentError::InvalidInput(format!(
                "overlap offset must be a non-negative number, got {}",
                self.alignment.overlap_offset_seconds
            )));
        }
        if !self.alignment.chapter_offset_seconds.is_finite()
            || self.alignment.chapter_offset_seconds < 0.0
        {
            return Err(AlignmentError::InvalidInput(format!(
                "chapter offset must be a non-negative number, got {}",
                self.alignment.chapter_offset_seconds
            )));
        }

        for segment in segments {
            if !segment.start_seconds.is_finite() || !segment.end_seconds.is_finite() {
                return Err(AlignmentError::InvalidInput(format!(
                    "non-finite segment timestamp for text {:?}",
                    segment.text
                )));
            }
        }
        for chapter in chapters {
            let bounded_end_finite = match chapter.end_time {
                ChapterEnd::At(end) => end.is_finite(),
                ChapterEnd::Unbounded => true,
            };
            if !chapter.start_time.is_finite() || !bounded_end_finite {
                return Err(AlignmentError::InvalidInput(format!(
                    "non-finite chapter timestamp for title {:?}",
                    chapter.title
                )));
            }
        }

        Ok(())
    }
}
