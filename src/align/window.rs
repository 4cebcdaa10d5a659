//! Chapter window adjustment
//!
//! Transcript discussion of a topic rarely starts exactly on the chapter cut:
//! it begins a little before and bleeds a little after. Widening each window
//! by a margin keeps that context attached to the chapter. The first chapter
//! is never pulled before video start.

use crate::chapters::{Chapter, ChapterEnd};

/// A chapter plus the window segments are matched against.
///
/// Nominal bounds are kept alongside the window: metadata reports nominal
/// times, while assignment and relative positions use the window.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedChapter {
    pub title: String,
    /// Start as declared by the chapter source
    pub nominal_start: f64,
    /// End as declared by the chapter source
    pub nominal_end: ChapterEnd,
    /// Widened (or pulled-back) start used for matching
    pub window_start: f64,
    /// Widened end used for matching
    pub window_end: ChapterEnd,
}

/// Symmetric widening for the overlap-window strategy.
///
/// `window = [max(0, start - margin), end + margin)`, except the first
/// chapter keeps its original start and an unbounded end stays unbounded.
pub fn widen_chapter_windows(chapters: &[Chapter], overlap_offset: f64) -> Vec<AdjustedChapter> {
    chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| {
            let window_start = if index == 0 {
                chapter.start_time
            } else {
                (chapter.start_time - overlap_offset).max(0.0)
            };

            AdjustedChapter {
                title: chapter.title.clone(),
                nominal_start: chapter.start_time,
                nominal_end: chapter.end_time,
                window_start,
                window_end: chapter.end_time.extended_by(overlap_offset),
            }
        })
        .collect()
}

/// One-directional start pull-back for the legacy single-assignment strategy.
/// Ends are left untouched; the first chapter keeps its start.
pub fn pull_back_chapter_starts(chapters: &[Chapter], chapter_offset: f64) -> Vec<AdjustedChapter> {
    chapters
        .iter()
        .enumerate()
        .map(|(index, chapter)| {
            let window_start = if index == 0 {
                chapter.start_time
            } else {
                (chapter.start_time - chapter_offset).max(0.0)
            };

            AdjustedChapter {
                title: chapter.title.clone(),
                nominal_start: chapter.start_time,
                nominal_end: chapter.end_time,
                window_start,
                window_end: chapter.end_time,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapters() -> Vec<Chapter> {
        vec![
            Chapter::bounded("Intro", 0.0, 60.0),
            Chapter::bounded("Middle", 60.0, 240.0),
            Chapter::open_ended("Outro", 240.0),
        ]
    }

    #[test]
    fn test_widening_expands_both_ends() {
        let adjusted = widen_chapter_windows(&chapters(), 5.0);

        assert_eq!(adjusted[1].window_start, 55.0);
        assert_eq!(adjusted[1].window_end, ChapterEnd::At(245.0));
    }

    #[test]
    fn test_first_chapter_start_is_preserved() {
        let adjusted = widen_chapter_windows(&chapters(), 5.0);
        assert_eq!(adjusted[0].window_start, 0.0);
        assert_eq!(adjusted[0].window_end, ChapterEnd::At(65.0));
    }

    #[test]
    fn test_window_start_never_goes_negative() {
        let chapters = vec![
            Chapter::bounded("A", 0.0, 2.0),
            Chapter::open_ended("B", 2.0),
        ];
        let adjusted = widen_chapter_windows(&chapters, 10.0);
        assert_eq!(adjusted[1].window_start, 0.0);
    }

    #[test]
    fn test_unbounded_end_stays_unbounded() {
        let adjusted = widen_chapter_windows(&chapters(), 5.0);
        assert_eq!(adjusted[2].window_end, ChapterEnd::Unbounded);
    }

    #[test]
    fn test_nominal_bounds_are_retained() {
        let adjusted = widen_chapter_windows(&chapters(), 5.0);
        assert_eq!(adjusted[1].nominal_start, 60.0);
        assert_eq!(adjusted[1].nominal_end, ChapterEnd::At(240.0));
    }

    #[test]
    fn test_pull_back_leaves_ends_untouched() {
        let adjusted = pull_back_chapter_starts(&chapters(), 20.0);

        assert_eq!(adjusted[0].window_start, 0.0);
        assert_eq!(adjusted[1].window_start, 40.0);
        assert_eq!(adjusted[1].window_end, ChapterEnd::At(240.0));
        assert_eq!(adjusted[2].window_end, ChapterEnd::Unbounded);
    }
}
