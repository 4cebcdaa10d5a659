//! Video-description timestamp parser
//!
//! Creators list chapters as timestamp lines in the description:
//!
//! ```text
//! 0:00 Intro
//! 2:15 - Setting up
//! 1:02:30 Closing thoughts
//! ```
//!
//! Each line yields a start time; ends are derived from the next line's
//! start, and the last chapter runs to the end of the video.

use regex::Regex;
use tracing::debug;

use super::{Chapter, ChapterEnd};

/// Minimum number of timestamp lines before a description counts as a
/// chapter list rather than a stray timestamp mention.
const MIN_CHAPTER_LINES: usize = 2;

/// Parses chapter markers out of free-form description text
#[derive(Debug, Clone)]
pub struct ChapterParser {
    line_pattern: Regex,
}

impl Default for ChapterParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ChapterParser {
    pub fn new() -> Self {
        // (H:)MM:SS or M:SS at line start, optional bracketing, then a title
        // separated by whitespace or a dash.
        let line_pattern = Regex::new(
            r"(?m)^\s*[\[(]?(?:(\d{1,2}):)?(\d{1,3}):(\d{2})[\])]?\s*[-–—:.]?\s*(\S.*?)\s*$",
        )
        .expect("chapter line pattern is valid");

        Self { line_pattern }
    }

    /// Extract ordered chapters from a description. Returns an empty list
    /// when the description has no usable chapter lines.
    pub fn parse_description(&self, description: &str) -> Vec<Chapter> {
        let mut markers: Vec<(f64, String)> = self
            .line_pattern
            .captures_iter(description)
            .filter_map(|caps| {
                let hours: f64 = caps
                    .get(1)
                    .map(|m| m.as_str().parse().unwrap_or(0.0))
                    .unwrap_or(0.0);
                let minutes: f64 = caps.get(2)?.as_str().parse().ok()?;
                let seconds: f64 = caps.get(3)?.as_str().parse().ok()?;
                let title = caps.get(4)?.as_str().trim().to_string();
                if title.is_empty() {
                    return None;
                }
                Some((hours * 3600.0 + minutes * 60.0 + seconds, title))
            })
            .collect();

        if markers.len() < MIN_CHAPTER_LINES {
            debug!(
                "Description yielded {} timestamp line(s), not treating as chapters",
                markers.len()
            );
            return Vec::new();
        }

        markers.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        markers.dedup_by(|a, b| a.0 == b.0);

        let starts: Vec<f64> = markers.iter().map(|(start, _)| *start).collect();
        markers
            .into_iter()
            .enumerate()
            .map(|(index, (start, title))| {
                let end = starts
                    .get(index + 1)
                    .map(|next| ChapterEnd::At(*next))
                    .unwrap_or(ChapterEnd::Unbounded);
                Chapter::new(title, start, end)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_basic_chapter_list() {
        let description = "\
Great video about things.

0:00 Intro
2:15 - Setting up
10:30 Deep dive
1:02:30 Closing thoughts

Follow me on socials!";

        let chapters = ChapterParser::new().parse_description(description);
        assert_eq!(chapters.len(), 4);
        assert_eq!(chapters[0].title, "Intro");
        assert_eq!(chapters[0].start_time, 0.0);
        assert_eq!(chapters[0].end_time, ChapterEnd::At(135.0));
        assert_eq!(chapters[1].title, "Setting up");
        assert_eq!(chapters[2].start_time, 630.0);
        assert_eq!(chapters[3].start_time, 3750.0);
        assert_eq!(chapters[3].end_time, ChapterEnd::Unbounded);
    }

    #[test]
    fn test_single_timestamp_is_not_a_chapter_list() {
        let description = "I mention the bug at 4:20 in this video.";
        let chapters = ChapterParser::new().parse_description(description);
        assert!(chapters.is_empty());
    }

    #[test]
    fn test_out_of_order_lines_are_sorted() {
        let description = "5:00 Second\n0:00 First";
        let chapters = ChapterParser::new().parse_description(description);
        assert_eq!(chapters[0].title, "First");
        assert_eq!(chapters[0].end_time, ChapterEnd::At(300.0));
        assert_eq!(chapters[1].title, "Second");
    }

    #[test]
    fn test_bracketed_timestamps() {
        let description = "[0:00] Intro\n[3:45] Outro";
        let chapters = ChapterParser::new().parse_description(description);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[1].start_time, 225.0);
    }

    #[test]
    fn test_empty_description() {
        assert!(ChapterParser::new().parse_description("").is_empty());
    }
}
