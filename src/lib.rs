/// YouTube Chapter Analyzer
///
/// Fetches YouTube video transcripts and chapter markers, aligns them into
/// per-chapter content blocks, and feeds the result to LLM-backed content
/// actions (summarize, answer questions, extract key points).

pub mod align;
pub mod analyzer;
pub mod chapters;
pub mod config;
pub mod llm;
pub mod transcript;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::align::{
    AlignmentError, AlignmentStrategy, AssignedSegment, ChapterAligner, ChapterContent,
    CombinedResult, ContentFilter, ResultMetadata,
};
pub use crate::analyzer::{AnalysisOutcome, VideoAnalyzer};
pub use crate::chapters::{
    Chapter, ChapterEnd, ChapterParser, ChapterSource, YouTubeChapterFetcher,
};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::llm::actions::{ActionKind, ActionProcessor, ActionResult};
pub use crate::llm::{create_llm, LLMConfig, LLMProvider, LLM};
pub use crate::transcript::{
    RawTranscriptSegment, TimeUnit, TranscriptSegment, TranscriptSource, YouTubeTranscriptFetcher,
};
