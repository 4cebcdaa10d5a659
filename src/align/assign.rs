//! Segment-to-chapter assignment
//!
//! The core decision: which chapter window(s) does each transcript segment
//! belong to? Direct interval containment when the transcript and chapter
//! clocks agree; proportional remapping when they are on incompatible scales;
//! deterministic fallbacks for segments that match nothing.

use super::window::AdjustedChapter;
use super::{AlignmentStrategy, SCALE_MISMATCH_RATIO, UNBOUNDED_CHAPTER_ESTIMATE_SECONDS};
use crate::transcript::TranscriptSegment;

/// A segment matched into a chapter, with the position used for matching.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedCue<'a> {
    pub segment: &'a TranscriptSegment,
    /// Position on the chapter time base. Equals the segment start unless
    /// scale-mismatch remapping was applied.
    pub position: f64,
}

/// Assign every segment to chapter window(s) per the chosen strategy.
///
/// Inputs must already be sorted by start time. Returns one cue list per
/// chapter, in chapter order; cue lists follow transcript order.
pub fn assign_segments<'a>(
    segments: &'a [TranscriptSegment],
    windows: &[AdjustedChapter],
    strategy: AlignmentStrategy,
) -> Vec<Vec<AssignedCue<'a>>> {
    let mut assigned: Vec<Vec<AssignedCue<'a>>> = vec![Vec::new(); windows.len()];
    if segments.is_empty() || windows.is_empty() {
        return assigned;
    }

    let transcript_duration = segments
        .last()
        .map(|segment| segment.end_seconds)
        .unwrap_or(0.0);
    let video_duration = estimated_video_duration(windows);
    let remap = scale_mismatch(transcript_duration, video_duration);

    for (segment_index, segment) in segments.iter().enumerate() {
        let position = if remap {
            segment.start_seconds / transcript_duration * video_duration
        } else {
            segment.start_seconds
        };

        match strategy {
            AlignmentStrategy::OverlapWindow => {
                // Widened windows overlap on purpose; a segment near a cut
                // belongs to every window containing it.
                for (chapter_index, window) in windows.iter().enumerate() {
                    if window_contains(window, chapter_index == windows.len() - 1, position) {
                        assigned[chapter_index].push(AssignedCue { segment, position });
                    }
                }
            }
            AlignmentStrategy::SingleAssignment => {
                let chapter_index = windows
                    .iter()
                    .enumerate()
                    .position(|(index, window)| {
                        window_contains(window, index == windows.len() - 1, position)
                    })
                    .unwrap_or_else(|| {
                        fallback_chapter_index(position, segment_index, segments.len(), windows)
                    });
                assigned[chapter_index].push(AssignedCue { segment, position });
            }
        }
    }

    assigned
}

/// Video duration estimated from the chapter list: the last chapter's nominal
/// end, or its start plus the fixed estimate when open-ended.
pub fn estimated_video_duration(windows: &[AdjustedChapter]) -> f64 {
    windows
        .last()
        .map(|window| {
            window
                .nominal_end
                .or_estimate(window.nominal_start, UNBOUNDED_CHAPTER_ESTIMATE_SECONDS)
        })
        .unwrap_or(0.0)
}

/// The time bases are incompatible when the transcript clock covers less than
/// one-tenth of the estimated video duration. Normalization alone cannot fix
/// that; segments get remapped proportionally instead.
pub fn scale_mismatch(transcript_duration: f64, video_duration: f64) -> bool {
    transcript_duration > 0.0
        && video_duration > 0.0
        && transcript_duration < video_duration * SCALE_MISMATCH_RATIO
}

/// Half-open containment against a window. The final chapter accepts every
/// position from its window start onward regardless of nominal end.
fn window_contains(window: &AdjustedChapter, is_last: bool, position: f64) -> bool {
    if position < window.window_start {
        return false;
    }
    is_last || window.window_end.admits(position)
}

/// Deterministic placement for a segment no window contains:
///   1. before the first chapter -> chapter 0
///   2. otherwise the last chapter whose window start <= position
///   3. otherwise proportional index over the transcript
fn fallback_chapter_index(
    position: f64,
    segment_index: usize,
    segment_count: usize,
    windows: &[AdjustedChapter],
) -> usize {
    if position < windows[0].window_start {
        return 0;
    }

    if let Some(index) = windows
        .iter()
        .rposition(|window| window.window_start <= position)
    {
        return index;
    }

    // Rules 1 and 2 are exhaustive for a non-empty chapter list; this is the
    // documented terminal default should they ever be reordered.
    let proportional =
        (segment_index as f64 / segment_count as f64 * windows.len() as f64).floor() as usize;
    proportional.min(windows.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::window::{pull_back_chapter_starts, widen_chapter_windows};
    use crate::chapters::Chapter;

    fn segment(text: &str, start: f64, end: f64) -> TranscriptSegment {
        TranscriptSegment::new(text, start, end)
    }

    fn texts<'a>(cues: &[AssignedCue<'a>]) -> Vec<&'a str> {
        cues.iter().map(|cue| cue.segment.text.as_str()).collect()
    }

    #[test]
    fn test_direct_containment_without_margin() {
        let segments = vec![
            segment("a", 0.0, 5.0),
            segment("b", 10.0, 15.0),
            segment("c", 30.0, 35.0),
        ];
        let chapters = vec![
            Chapter::bounded("Intro", 0.0, 10.0),
            Chapter::bounded("Main", 10.0, 30.0),
            Chapter::open_ended("End", 30.0),
        ];
        let windows = widen_chapter_windows(&chapters, 0.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::OverlapWindow);
        assert_eq!(texts(&assigned[0]), vec!["a"]);
        assert_eq!(texts(&assigned[1]), vec!["b"]);
        assert_eq!(texts(&assigned[2]), vec!["c"]);
    }

    #[test]
    fn test_boundary_segment_goes_to_next_chapter() {
        // A start exactly on a chapter's end sits in the next window.
        let segments = vec![segment("tie", 10.0, 12.0)];
        let chapters = vec![
            Chapter::bounded("First", 0.0, 10.0),
            Chapter::bounded("Second", 10.0, 20.0),
            Chapter::open_ended("Third", 20.0),
        ];
        let windows = widen_chapter_windows(&chapters, 0.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::OverlapWindow);
        assert!(assigned[0].is_empty());
        assert_eq!(texts(&assigned[1]), vec!["tie"]);
    }

    #[test]
    fn test_final_chapter_accepts_past_nominal_end() {
        let segments = vec![segment("coda", 500.0, 505.0)];
        let chapters = vec![
            Chapter::bounded("A", 0.0, 10.0),
            Chapter::bounded("B", 10.0, 20.0),
        ];
        let windows = widen_chapter_windows(&chapters, 0.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::OverlapWindow);
        assert_eq!(texts(&assigned[1]), vec!["coda"]);
    }

    #[test]
    fn test_overlap_margin_duplicates_across_boundary() {
        let segments = vec![segment("bridge", 8.0, 9.0)];
        let chapters = vec![
            Chapter::bounded("A", 0.0, 10.0),
            Chapter::bounded("B", 10.0, 20.0),
        ];
        let windows = widen_chapter_windows(&chapters, 5.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::OverlapWindow);
        assert_eq!(texts(&assigned[0]), vec!["bridge"]);
        assert_eq!(texts(&assigned[1]), vec!["bridge"]);
    }

    #[test]
    fn test_single_assignment_stops_at_first_match() {
        let segments = vec![segment("bridge", 8.0, 9.0)];
        let chapters = vec![
            Chapter::bounded("A", 0.0, 10.0),
            Chapter::bounded("B", 10.0, 20.0),
        ];
        // Pull-back makes B's window [0, 20); A still matches first.
        let windows = pull_back_chapter_starts(&chapters, 10.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::SingleAssignment);
        assert_eq!(texts(&assigned[0]), vec!["bridge"]);
        assert!(assigned[1].is_empty());
    }

    #[test]
    fn test_gap_segment_falls_back_to_preceding_chapter() {
        // Chapters [First 0-5, Second 15-) leave a 5-15 gap. A segment at 9
        // matches no window and lands in the last chapter whose start <= 9:
        // First, because Second starts at 15.
        let segments = vec![segment("mid", 9.0, 9.0)];
        let chapters = vec![
            Chapter::bounded("First", 0.0, 5.0),
            Chapter::open_ended("Second", 15.0),
        ];
        let windows = pull_back_chapter_starts(&chapters, 0.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::SingleAssignment);
        assert_eq!(texts(&assigned[0]), vec!["mid"]);
        assert!(assigned[1].is_empty());
    }

    #[test]
    fn test_segment_before_first_chapter_goes_to_chapter_zero() {
        let segments = vec![segment("preroll", 1.0, 2.0)];
        let chapters = vec![
            Chapter::bounded("First", 30.0, 60.0),
            Chapter::open_ended("Second", 60.0),
        ];
        let windows = pull_back_chapter_starts(&chapters, 0.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::SingleAssignment);
        assert_eq!(texts(&assigned[0]), vec!["preroll"]);
    }

    #[test]
    fn test_scale_mismatch_triggers_proportional_remap() {
        // Transcript clock tops out at 30s against a ~3600s video: remap by
        // relative position. A segment at 15/30 of the transcript sits near
        // the middle of the video, i.e. the second chapter.
        let segments = vec![
            segment("start", 0.0, 1.0),
            segment("middle", 15.0, 16.0),
            segment("tail", 29.0, 30.0),
        ];
        let chapters = vec![
            Chapter::bounded("One", 0.0, 1200.0),
            Chapter::bounded("Two", 1200.0, 2400.0),
            Chapter::bounded("Three", 2400.0, 3600.0),
        ];
        let windows = widen_chapter_windows(&chapters, 0.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::OverlapWindow);
        assert_eq!(texts(&assigned[0]), vec!["start"]);
        assert_eq!(texts(&assigned[1]), vec!["middle"]);
        assert_eq!(texts(&assigned[2]), vec!["tail"]);
    }

    #[test]
    fn test_scale_mismatch_detection_thresholds() {
        assert!(scale_mismatch(30.0, 3600.0));
        assert!(!scale_mismatch(360.0, 3600.0));
        assert!(!scale_mismatch(0.0, 3600.0));
        assert!(!scale_mismatch(30.0, 0.0));
    }

    #[test]
    fn test_estimated_duration_uses_fixed_estimate_for_unbounded() {
        let chapters = vec![
            Chapter::bounded("A", 0.0, 100.0),
            Chapter::open_ended("B", 100.0),
        ];
        let windows = widen_chapter_windows(&chapters, 0.0);
        assert_eq!(estimated_video_duration(&windows), 400.0);
    }

    #[test]
    fn test_comparable_clocks_are_not_remapped() {
        // Transcript covering a third of the video is within tolerance; the
        // segment keeps its own clock and lands by direct containment.
        let segments = vec![segment("talk", 500.0, 510.0), segment("end", 1200.0, 1205.0)];
        let chapters = vec![
            Chapter::bounded("One", 0.0, 600.0),
            Chapter::open_ended("Two", 600.0),
        ];
        let windows = widen_chapter_windows(&chapters, 0.0);

        let assigned = assign_segments(&segments, &windows, AlignmentStrategy::OverlapWindow);
        assert_eq!(texts(&assigned[0]), vec!["talk"]);
        assert_eq!(texts(&assigned[1]), vec!["end"]);
    }
}
