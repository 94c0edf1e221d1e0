/// Suffix YouTube appends to auto-generated artist channels. Matched
/// case-sensitively; items whose raw artist still carries it after
/// filtering are not real artist channels.
pub const TOPIC_SUFFIX: &str = " - Topic";

/// Descriptive suffixes commonly tacked onto video titles, in match order.
/// At most one is stripped per title.
const VIDEO_SUFFIXES: [&str; 6] = [
    " (official video)",
    " (official music video)",
    " (lyric video)",
    " (official audio)",
    " (audio)",
    " (lyrics)",
];

/// Canonicalizes a raw (title, artist) pair for comparison and submission.
///
/// Strips the `" - Topic"` channel suffix from the artist (exact,
/// case-sensitive), then strips the first matching video suffix from the
/// title. The suffix match is case-insensitive but the remaining text keeps
/// its original casing. Both results are whitespace-trimmed. No other
/// transformation is applied.
pub fn normalize_track(track_name: &str, artist_name: &str) -> (String, String) {
    let artist = match artist_name.strip_suffix(TOPIC_SUFFIX) {
        Some(stripped) => stripped,
        None => artist_name,
    };

    let track_lower = track_name.to_lowercase();
    let mut track = track_name;
    for suffix in VIDEO_SUFFIXES {
        if track_lower.ends_with(suffix)
            && track_name.is_char_boundary(track_name.len() - suffix.len())
        {
            track = &track_name[..track_name.len() - suffix.len()];
            break;
        }
    }

    (track.trim().to_string(), artist.trim().to_string())
}

/// Lower-cased (track, artist) key used for the session-local seen set.
pub fn seen_key(track_name: &str, artist_name: &str) -> (String, String) {
    (track_name.to_lowercase(), artist_name.to_lowercase())
}
