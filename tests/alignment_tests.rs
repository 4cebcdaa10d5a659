use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use yt_chapter_analyzer::config::{AlignmentConfig, FilterConfig};
use yt_chapter_analyzer::{
    AlignmentStrategy, Chapter, ChapterAligner, ChapterSource, TranscriptSegment,
    TranscriptSource, VideoAnalyzer,
};

fn aligner(strategy: AlignmentStrategy, overlap: f64) -> ChapterAligner {
    ChapterAligner::new(
        AlignmentConfig {
            strategy,
            overlap_offset_seconds: overlap,
            chapter_offset_seconds: 0.0,
        },
        FilterConfig::default(),
    )
}

fn segment(text: &str, start: f64, end: f64) -> TranscriptSegment {
    TranscriptSegment::new(text, start, end)
}

#[test]
fn scenario_a_direct_mapping_without_overlap() {
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

    let result = aligner(AlignmentStrategy::OverlapWindow, 0.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    let contents: Vec<&str> = result.chapters.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["a", "b", "c"]);
}

#[test]
fn scenario_b_gap_segment_goes_to_last_chapter_starting_before_it() {
    // Chapters leave a 5-15 gap; the segment at 9 matches nothing directly.
    // Fallback picks the last chapter whose start <= 9: First, since Second
    // starts at 15.
    let segments = vec![segment("mid", 9.0, 9.0)];
    let chapters = vec![
        Chapter::bounded("First", 0.0, 5.0),
        Chapter::open_ended("Second", 15.0),
    ];

    let result = aligner(AlignmentStrategy::SingleAssignment, 0.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    assert_eq!(result.chapters[0].title, "First");
    assert_eq!(result.chapters[0].content, "mid");
    assert_eq!(result.chapters[1].content, "");
}

#[test]
fn scenario_c_all_chapters_filtered_falls_back_to_whole_video() {
    let segments = vec![
        segment("real content", 0.0, 5.0),
        segment("more content", 50.0, 55.0),
    ];
    let chapters = vec![
        Chapter::bounded("Sponsor segment", 0.0, 30.0),
        Chapter::open_ended("Advertisement", 30.0),
    ];

    let result = aligner(AlignmentStrategy::OverlapWindow, 5.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    assert_eq!(result.chapters.len(), 1);
    assert_eq!(result.chapters[0].title, "Full Video");
    assert_eq!(result.chapters[0].content, "real content more content");
    assert_eq!(result.metadata.chapter_count, 1);
}

#[test]
fn scenario_d_overlap_margin_duplicates_boundary_segment() {
    let segments = vec![segment("bridge", 8.0, 9.0)];
    let chapters = vec![
        Chapter::bounded("A", 0.0, 10.0),
        Chapter::bounded("B", 10.0, 20.0),
    ];

    let result = aligner(AlignmentStrategy::OverlapWindow, 5.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    assert_eq!(result.chapters[0].content, "bridge");
    assert_eq!(result.chapters[1].content, "bridge");
}

#[test]
fn boundary_segment_belongs_to_next_chapter() {
    let segments = vec![segment("tie", 10.0, 11.0)];
    let chapters = vec![
        Chapter::bounded("First", 0.0, 10.0),
        Chapter::bounded("Second", 10.0, 20.0),
        Chapter::open_ended("Third", 20.0),
    ];

    let result = aligner(AlignmentStrategy::OverlapWindow, 0.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    assert_eq!(result.chapters[0].content, "");
    assert_eq!(result.chapters[1].content, "tie");
    assert_eq!(result.chapters[2].content, "");
}

#[test]
fn content_order_follows_segment_start_time() {
    let segments = vec![
        segment("third", 8.0, 9.0),
        segment("first", 1.0, 2.0),
        segment("second", 4.0, 5.0),
    ];
    let chapters = vec![Chapter::open_ended("All", 0.0)];

    let result = aligner(AlignmentStrategy::OverlapWindow, 0.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    assert_eq!(result.chapters[0].content, "first second third");
    let offsets: Vec<f64> = result.chapters[0]
        .segments
        .iter()
        .map(|s| s.offset)
        .collect();
    assert_eq!(offsets, vec![1.0, 4.0, 8.0]);
}

#[test]
fn relative_positions_stay_in_unit_interval() {
    let segments: Vec<TranscriptSegment> = (0..50)
        .map(|i| segment("w", i as f64 * 7.3, i as f64 * 7.3 + 2.0))
        .collect();
    let chapters = vec![
        Chapter::bounded("A", 0.0, 60.0),
        Chapter::bounded("B", 60.0, 200.0),
        Chapter::open_ended("C", 200.0),
    ];

    for strategy in [
        AlignmentStrategy::OverlapWindow,
        AlignmentStrategy::SingleAssignment,
    ] {
        let result = aligner(strategy, 5.0)
            .align("vid", &segments, &chapters)
            .unwrap();
        for chapter in &result.chapters {
            for placed in &chapter.segments {
                assert!(
                    (0.0..=1.0).contains(&placed.relative_position),
                    "relative position {} out of range in {:?}",
                    placed.relative_position,
                    chapter.title
                );
            }
        }
    }
}

#[test]
fn alignment_is_idempotent() {
    let segments = vec![
        segment("a", 0.0, 5.0),
        segment("b", 8.0, 12.0),
        segment("c", 25.0, 30.0),
    ];
    let chapters = vec![
        Chapter::bounded("One", 0.0, 10.0),
        Chapter::open_ended("Two", 10.0),
    ];
    let aligner = aligner(AlignmentStrategy::OverlapWindow, 5.0);

    let first = aligner.align("vid", &segments, &chapters).unwrap();
    let second = aligner.align("vid", &segments, &chapters).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn every_assigned_segment_appears_exactly_once_per_assignment() {
    let segments = vec![
        segment("alpha", 2.0, 4.0),
        segment("beta", 12.0, 14.0),
        segment("gamma", 18.0, 19.0),
    ];
    let chapters = vec![
        Chapter::bounded("A", 0.0, 10.0),
        Chapter::bounded("B", 10.0, 20.0),
    ];

    let result = aligner(AlignmentStrategy::OverlapWindow, 0.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    for chapter in &result.chapters {
        for placed in &chapter.segments {
            let occurrences = chapter
                .content
                .split_whitespace()
                .filter(|word| *word == placed.text)
                .count();
            assert_eq!(occurrences, 1, "{} in {}", placed.text, chapter.title);
        }
    }
}

#[test]
fn scale_mismatched_transcript_is_remapped_proportionally() {
    // A 60-second transcript clock against a one-hour chapter clock: direct
    // containment would dump everything into the first chapter.
    let segments = vec![
        segment("opening", 0.0, 2.0),
        segment("midpoint", 30.0, 32.0),
        segment("closing", 58.0, 60.0),
    ];
    let chapters = vec![
        Chapter::bounded("Start", 0.0, 1200.0),
        Chapter::bounded("Middle", 1200.0, 2400.0),
        Chapter::open_ended("Finish", 2400.0),
    ];

    let result = aligner(AlignmentStrategy::OverlapWindow, 0.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    assert_eq!(result.chapters[0].content, "opening");
    assert_eq!(result.chapters[1].content, "midpoint");
    assert_eq!(result.chapters[2].content, "closing");
}

#[test]
fn filtering_can_be_disabled_per_call() {
    let segments = vec![segment("sponsored by someone", 0.0, 3.0)];
    let chapters = vec![Chapter::open_ended("Sponsor", 0.0)];

    let permissive = ChapterAligner::new(
        AlignmentConfig::default(),
        FilterConfig {
            enable_chapter_filtering: false,
            enable_transcript_filtering: false,
            ..FilterConfig::default()
        },
    );

    let result = permissive.align("vid", &segments, &chapters).unwrap();
    assert_eq!(result.chapters.len(), 1);
    assert_eq!(result.chapters[0].title, "Sponsor");
    assert_eq!(result.chapters[0].content, "sponsored by someone");
}

#[test]
fn metadata_reflects_nominal_chapter_bounds() {
    let segments = vec![segment("a", 0.0, 5.0), segment("b", 110.0, 115.0)];
    let chapters = vec![
        Chapter::bounded("One", 0.0, 100.0),
        Chapter::open_ended("Two", 100.0),
    ];

    let result = aligner(AlignmentStrategy::OverlapWindow, 5.0)
        .align("vid", &segments, &chapters)
        .unwrap();

    // Last chapter is open-ended: its start plus the 300s estimate, with no
    // overlap inflation.
    assert_eq!(result.metadata.total_duration, 400.0);
    assert_eq!(result.metadata.chapter_count, 2);
    assert_eq!(result.metadata.transcript_item_count, 2);
    assert_eq!(result.metadata.overlap_offset_seconds, 5.0);
}

// End-to-end through the analyzer with mocked sources.

struct StaticTranscript(Vec<TranscriptSegment>);

#[async_trait]
impl TranscriptSource for StaticTranscript {
    async fn fetch_transcript(&self, _video_id: &str) -> Result<Vec<TranscriptSegment>> {
        Ok(self.0.clone())
    }
}

struct StaticChapters(Vec<Chapter>);

#[async_trait]
impl ChapterSource for StaticChapters {
    async fn fetch_chapters(&self, _video_id: &str) -> Result<Vec<Chapter>> {
        Ok(self.0.clone())
    }
}

#[tokio::test]
async fn analyzer_end_to_end_with_mocked_sources() {
    let analyzer = VideoAnalyzer::with_sources(
        aligner(AlignmentStrategy::OverlapWindow, 0.0),
        Arc::new(StaticTranscript(vec![
            segment("intro words", 0.0, 4.0),
            segment("main words", 12.0, 16.0),
        ])),
        Arc::new(StaticChapters(vec![
            Chapter::bounded("Intro", 0.0, 10.0),
            Chapter::open_ended("Main", 10.0),
        ])),
    );

    let outcome = analyzer.analyze("dQw4w9WgXcQ").await.unwrap();
    assert_eq!(outcome.result.video_id, "dQw4w9WgXcQ");
    assert_eq!(outcome.result.chapters[0].content, "intro words");
    assert_eq!(outcome.result.chapters[1].content, "main words");
    assert!(outcome.transcript_error.is_none());
    assert!(outcome.chapter_error.is_none());
}

#[tokio::test]
async fn analyzer_with_no_chapters_returns_empty_result() {
    let analyzer = VideoAnalyzer::with_sources(
        aligner(AlignmentStrategy::OverlapWindow, 0.0),
        Arc::new(StaticTranscript(vec![segment("words", 0.0, 4.0)])),
        Arc::new(StaticChapters(Vec::new())),
    );

    let outcome = analyzer.analyze("vid").await.unwrap();
    assert!(outcome.result.chapters.is_empty());
    assert_eq!(outcome.result.metadata.chapter_count, 0);
}
