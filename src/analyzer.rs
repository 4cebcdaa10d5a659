use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::align::{ChapterAligner, CombinedResult};
use crate::chapters::{ChapterSource, YouTubeChapterFetcher};
use crate::config::Config;
use crate::transcript::{TranscriptSource, YouTubeTranscriptFetcher};

/// One analysis run: the alignment result plus fetch-layer annotations.
///
/// Fetch failures never abort a run; the failing side degrades to an empty
/// list and its error is carried here as a string for the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub result: CombinedResult,
    pub analyzed_at: DateTime<Utc>,
    pub elapsed_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_error: Option<String>,
}

/// Orchestrates one video analysis: concurrent transcript and chapter fetch,
/// then synchronous alignment over the resolved lists.
pub struct VideoAnalyzer {
    transcripts: Arc<dyn TranscriptSource>,
    chapters: Arc<dyn ChapterSource>,
    aligner: ChapterAligner,
}

impl VideoAnalyzer {
    /// Analyzer wired to the YouTube fetchers.
    pub fn new(config: &Config) -> Self {
        Self {
            transcripts: Arc::new(YouTubeTranscriptFetcher::new(&config.fetch)),
            chapters: Arc::new(YouTubeChapterFetcher::new(&config.fetch)),
            aligner: ChapterAligner::from_config(config),
        }
    }

    /// Analyzer over custom sources; tests inject mocks here.
    pub fn with_sources(
        aligner: ChapterAligner,
        transcripts: Arc<dyn TranscriptSource>,
        chapters: Arc<dyn ChapterSource>,
    ) -> Self {
        Self {
            transcripts,
            chapters,
            aligner,
        }
    }

    /// Fetch both inputs concurrently and align them.
    pub async fn analyze(&self, video_id: &str) -> Result<AnalysisOutcome> {
        let started = Instant::now();
        info!("🚀 Analyzing video: {}", video_id);

        let (transcript, chapters) = tokio::join!(
            self.transcripts.fetch_transcript(video_id),
            self.chapters.fetch_chapters(video_id),
        );

        let (segments, transcript_error) = unwrap_or_empty("transcript", video_id, transcript);
        let (chapters, chapter_error) = unwrap_or_empty("chapters", video_id, chapters);

        info!(
            "📥 Fetched {} segments and {} chapters for {}",
            segments.len(),
            chapters.len(),
            video_id
        );

        let result = self.aligner.align(video_id, &segments, &chapters)?;
        let elapsed_seconds = started.elapsed().as_secs_f64();
        info!(
            "🎉 Aligned {} chapters ({} strategy) in {:.2}s",
            result.metadata.chapter_count,
            self.aligner.strategy().as_str(),
            elapsed_seconds
        );

        Ok(AnalysisOutcome {
            result,
            analyzed_at: Utc::now(),
            elapsed_seconds,
            transcript_error,
            chapter_error,
        })
    }
}

fn unwrap_or_empty<T>(
    what: &str,
    video_id: &str,
    fetched: Result<Vec<T>>,
) -> (Vec<T>, Option<String>) {
    match fetched {
        Ok(items) => (items, None),
        Err(e) => {
            warn!("❌ Failed to fetch {} for {}: {}", what, video_id, e);
            (Vec::new(), Some(e.to_string()))
        }
    }
}
