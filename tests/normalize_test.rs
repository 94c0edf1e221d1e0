use scroblcli::normalize::{TOPIC_SUFFIX, normalize_track, seen_key};

#[test]
fn test_topic_suffix_is_stripped_from_artist() {
    let (track, artist) = normalize_track("Song", "Some Band - Topic");
    assert_eq!(track, "Song");
    assert_eq!(artist, "Some Band");
}

#[test]
fn test_topic_suffix_match_is_case_sensitive() {
    let (_, artist) = normalize_track("Song", "Some Band - topic");
    assert_eq!(artist, "Some Band - topic");
}

#[test]
fn test_video_suffix_is_stripped_case_insensitively() {
    let (track, _) = normalize_track("Song (Official Video)", "Artist");
    assert_eq!(track, "Song");

    let (track, _) = normalize_track("Song (OFFICIAL MUSIC VIDEO)", "Artist");
    assert_eq!(track, "Song");

    let (track, _) = normalize_track("Song (lyrics)", "Artist");
    assert_eq!(track, "Song");
}

#[test]
fn test_stripped_text_keeps_original_case() {
    let (track, _) = normalize_track("MiXeD CaSe SoNg (Official Audio)", "Artist");
    assert_eq!(track, "MiXeD CaSe SoNg");
}

#[test]
fn test_at_most_one_suffix_is_applied() {
    let (track, _) = normalize_track("Song (Audio) (Lyrics)", "Artist");
    assert_eq!(track, "Song (Audio)");
}

#[test]
fn test_suffix_in_the_middle_is_not_stripped() {
    let (track, _) = normalize_track("Song (Official Video) Extended", "Artist");
    assert_eq!(track, "Song (Official Video) Extended");
}

#[test]
fn test_whitespace_is_trimmed() {
    let (track, artist) = normalize_track("  Song  ", "  Artist  ");
    assert_eq!(track, "Song");
    assert_eq!(artist, "Artist");
}

#[test]
fn test_normalization_is_idempotent() {
    let cases = [
        ("Song (Official Video)", "Some Band - Topic"),
        ("Plain Song", "Plain Artist"),
        ("  Spaced  ", "Artist (Lyrics)"),
    ];

    for (title, artist) in cases {
        let (t1, a1) = normalize_track(title, artist);
        let (t2, a2) = normalize_track(&t1, &a1);
        assert_eq!((t1, a1), (t2, a2));
    }
}

#[test]
fn test_no_other_transformation_is_applied() {
    // No featuring-artist splitting, no Unicode normalization.
    let (track, artist) = normalize_track("Héroes del Silencio", "Artist feat. Other");
    assert_eq!(track, "Héroes del Silencio");
    assert_eq!(artist, "Artist feat. Other");
}

#[test]
fn test_seen_key_is_lower_cased() {
    assert_eq!(
        seen_key("Some Song", "Some ARTIST"),
        ("some song".to_string(), "some artist".to_string())
    );
}

#[test]
fn test_topic_suffix_constant() {
    assert_eq!(TOPIC_SUFFIX, " - Topic");
}
