use serde::Serializer;

use crate::transcript::TranscriptSegment;

/// Flatten segments into plain text, one space between segments, timestamps dropped
pub fn format_as_text(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Sum of per-segment word counts
pub fn count_segment_words(segments: &[TranscriptSegment]) -> usize {
    segments.iter().map(|segment| count_words(&segment.text)).sum()
}

/// End of the last segment, or zero for an empty transcript
pub fn total_duration(segments: &[TranscriptSegment]) -> f64 {
    segments.last().map(TranscriptSegment::end).unwrap_or(0.0)
}

/// Serialize seconds as a JSON integer when there is no fractional part
pub fn serialize_seconds<S>(seconds: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if seconds.is_finite() && seconds.fract() == 0.0 && seconds.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*seconds as i64)
    } else {
        serializer.serialize_f64(*seconds)
    }
}
