//! Chapter content assembly
//!
//! Turns per-chapter cue lists into the final content blocks: time-ordered
//! concatenation, relative positions within the window, and aggregate
//! metadata for the whole run.

use super::assign::AssignedCue;
use super::window::AdjustedChapter;
use super::{
    AssignedSegment, ChapterContent, ResultMetadata, UNBOUNDED_CHAPTER_ESTIMATE_SECONDS,
};
use crate::chapters::{Chapter, ChapterEnd};

/// Assemble one content block per chapter window.
pub fn assemble_chapters(
    windows: &[AdjustedChapter],
    assigned: Vec<Vec<AssignedCue<'_>>>,
) -> Vec<ChapterContent> {
    windows
        .iter()
        .zip(assigned)
        .map(|(window, mut cues)| {
            // Assignment follows transcript order, but interleaved multi-window
            // matches make per-chapter order worth re-establishing.
            cues.sort_by(|a, b| {
                a.segment
                    .start_seconds
                    .partial_cmp(&b.segment.start_seconds)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let content = cues
                .iter()
                .map(|cue| cue.segment.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();

            let duration = effective_window_duration(window);
            let segments = cues
                .into_iter()
                .map(|cue| AssignedSegment {
                    text: cue.segment.text.clone(),
                    offset: cue.segment.start_seconds,
                    duration: cue.segment.duration(),
                    relative_position: relative_position(cue.position, window.window_start, duration),
                })
                .collect();

            ChapterContent {
                title: window.title.clone(),
                start_time: window.window_start,
                end_time: window.window_end,
                content,
                segments,
            }
        })
        .collect()
}

/// Aggregate metadata over the nominal (pre-adjustment) chapters, so the
/// overlap margin never inflates the reported video duration.
pub fn build_metadata(
    chapters: &[Chapter],
    transcript_item_count: usize,
    overlap_offset_seconds: f64,
) -> ResultMetadata {
    let total_duration = chapters
        .last()
        .map(|chapter| {
            chapter
                .end_time
                .or_estimate(chapter.start_time, UNBOUNDED_CHAPTER_ESTIMATE_SECONDS)
        })
        .unwrap_or(0.0);

    ResultMetadata {
        total_duration,
        chapter_count: chapters.len(),
        transcript_item_count,
        overlap_offset_seconds,
    }
}

fn effective_window_duration(window: &AdjustedChapter) -> f64 {
    match window.window_end {
        ChapterEnd::At(end) => end - window.window_start,
        ChapterEnd::Unbounded => UNBOUNDED_CHAPTER_ESTIMATE_SECONDS,
    }
}

fn relative_position(position: f64, window_start: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 0.0;
    }
    ((position - window_start) / duration).clamp(0.0, 1.0)
}
