//! Denylist content filter
//!
//! Drops transcript segments and chapters whose text matches sponsorship or
//! ad phrasing before alignment. The denylist is an explicit value handed in
//! by the caller; there is no global filter state.

use crate::chapters::Chapter;
use crate::transcript::TranscriptSegment;

/// Case-insensitive substring filter over segment text and chapter titles
#[derive(Debug, Clone)]
pub struct ContentFilter {
    phrases: Vec<String>,
}

impl ContentFilter {
    /// Build a filter from denylisted phrases. Matching is case-insensitive,
    /// so phrases are folded once here rather than on every probe.
    pub fn new<S: AsRef<str>>(phrases: &[S]) -> Self {
        Self {
            phrases: phrases
                .iter()
                .map(|p| p.as_ref().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// True when `text` contains any denylisted phrase.
    pub fn matches(&self, text: &str) -> bool {
        if self.phrases.is_empty() {
            return false;
        }
        let folded = text.to_lowercase();
        self.phrases.iter().any(|phrase| folded.contains(phrase))
    }

    /// Segments whose text passes the denylist.
    pub fn retain_segments(&self, segments: &[TranscriptSegment]) -> Vec<TranscriptSegment> {
        segments
            .iter()
            .filter(|segment| !self.matches(&segment.text))
            .cloned()
            .collect()
    }

    /// Chapters whose title passes the denylist.
    pub fn retain_chapters(&self, chapters: &[Chapter]) -> Vec<Chapter> {
        chapters
            .iter()
            .filter(|chapter| !self.matches(&chapter.title))
            .cloned()
            .collect()
    }
}
