use std::sync::Mutex;

use chrono::Utc;
use scroblcli::{
    Res,
    error::SyncError,
    history::{AlbumRef, ArtistRef, HistoryItem},
    store::ScrobbleStore,
    sync::{BACKDATE_OFFSET_SECS, SCROBBLE_SPACING_SECS, Scrobbler, ScrobbleSink, backdate},
};

/// What a mock sink saw for one submission.
#[derive(Debug, Clone)]
struct Submission {
    track: String,
    artist: String,
    album: String,
    session_key: String,
    timestamp: i64,
}

enum SinkBehavior {
    Accept,
    Reject,
    Fail,
}

struct MockSink {
    behavior: SinkBehavior,
    submissions: Mutex<Vec<Submission>>,
}

impl MockSink {
    fn new(behavior: SinkBehavior) -> MockSink {
        MockSink {
            behavior,
            submissions: Mutex::new(Vec::new()),
        }
    }

    fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }
}

impl ScrobbleSink for MockSink {
    async fn submit(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: &str,
        session_key: &str,
        timestamp: i64,
    ) -> Res<bool> {
        self.submissions.lock().unwrap().push(Submission {
            track: track_name.to_string(),
            artist: artist_name.to_string(),
            album: album_name.to_string(),
            session_key: session_key.to_string(),
            timestamp,
        });

        match self.behavior {
            SinkBehavior::Accept => Ok(true),
            SinkBehavior::Reject => Ok(false),
            SinkBehavior::Fail => Err(SyncError::RemoteRequest("connection reset".to_string())),
        }
    }
}

fn item(title: &str, artist: &str, played: &str, video_id: &str) -> HistoryItem {
    HistoryItem {
        title: title.to_string(),
        artists: vec![ArtistRef {
            name: artist.to_string(),
        }],
        album: None,
        played: (!played.is_empty()).then(|| played.to_string()),
        video_id: (!video_id.is_empty()).then(|| video_id.to_string()),
    }
}

fn item_with_album(title: &str, artist: &str, played: &str, album: &str) -> HistoryItem {
    let mut it = item(title, artist, played, "");
    it.album = Some(AlbumRef {
        name: album.to_string(),
    });
    it
}

#[tokio::test(start_paused = true)]
async fn items_outside_recency_window_are_skipped_silently() {
    let sink = MockSink::new(SinkBehavior::Accept);
    let store = ScrobbleStore::open_in_memory().unwrap();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let items = vec![
        item("Song A", "Artist", "Last week", "v1"),
        item("Song B", "Artist", "", "v2"),
        item("Song C", "Artist", "February 2024", "v3"),
    ];
    let report = scrobbler.process(&items).await;

    assert_eq!(report.scrobbled, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 0);
    assert!(sink.submissions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn topic_channel_items_are_dropped_entirely() {
    let sink = MockSink::new(SinkBehavior::Accept);
    let store = ScrobbleStore::open_in_memory().unwrap();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let items = vec![item(
        "Song (Official Video)",
        "Artist X - Topic",
        "Today",
        "v1",
    )];
    let report = scrobbler.process(&items).await;

    // Contributes to neither scrobbled nor skipped counts.
    assert_eq!(report.scrobbled, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 0);
    assert!(sink.submissions().is_empty());
    assert_eq!(store.record_count(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn accepted_submission_is_normalized_and_recorded() {
    let sink = MockSink::new(SinkBehavior::Accept);
    let store = ScrobbleStore::open_in_memory().unwrap();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let items = vec![item("Song (Official Video)", "Artist", "Today", "v1")];
    let report = scrobbler.process(&items).await;

    assert_eq!(report.scrobbled, 1);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 0);

    let subs = sink.submissions();
    assert_eq!(subs.len(), 1);
    assert_eq!(subs[0].track, "Song");
    assert_eq!(subs[0].artist, "Artist");
    assert_eq!(subs[0].session_key, "sess");
    assert_eq!(store.record_count(), Some(1));
    assert!(store.recent_duplicate("Song", "Artist", "v1").is_some());
}

#[tokio::test(start_paused = true)]
async fn album_defaults_to_the_normalized_track_name() {
    let sink = MockSink::new(SinkBehavior::Accept);
    let store = ScrobbleStore::open_in_memory().unwrap();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let items = vec![
        item("Song One (Official Audio)", "Artist", "Today", "v1"),
        item_with_album("Song Two", "Artist", "Today", "The Album"),
    ];
    scrobbler.process(&items).await;

    let subs = sink.submissions();
    assert_eq!(subs.len(), 2);
    assert_eq!(subs[0].album, "Song One");
    assert_eq!(subs[1].album, "The Album");
}

#[tokio::test(start_paused = true)]
async fn session_local_set_dedups_within_one_run() {
    let sink = MockSink::new(SinkBehavior::Accept);
    // Disabled store: the in-run seen set alone must prevent the repeat,
    // and the skip never touches persistent storage.
    let store = ScrobbleStore::disabled();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let items = vec![
        item("Same Song", "Same Artist", "Today", "v1"),
        item("Same Song", "Same Artist", "Today", "v2"),
    ];
    let report = scrobbler.process(&items).await;

    assert_eq!(report.scrobbled, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors, 0);
    assert_eq!(sink.submissions().len(), 1);
    assert_eq!(store.record_count(), None);
}

#[tokio::test(start_paused = true)]
async fn persistent_store_catches_the_repeat_when_available() {
    let sink = MockSink::new(SinkBehavior::Accept);
    let store = ScrobbleStore::open_in_memory().unwrap();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let items = vec![
        item("Same Song", "Same Artist", "Today", "v1"),
        item("same song", "SAME ARTIST", "Yesterday", "v2"),
    ];
    let report = scrobbler.process(&items).await;

    assert_eq!(report.scrobbled, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.errors, 0);
    assert_eq!(sink.submissions().len(), 1);
    assert_eq!(store.record_count(), Some(1));
}

#[tokio::test(start_paused = true)]
async fn rejected_submission_counts_as_error_and_leaves_no_trace() {
    let sink = MockSink::new(SinkBehavior::Reject);
    let store = ScrobbleStore::open_in_memory().unwrap();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let items = vec![
        item("Song", "Artist", "Today", "v1"),
        item("Song", "Artist", "Today", "v1"),
    ];
    let report = scrobbler.process(&items).await;

    // Neither attempt was accepted: no persistent record, seen set
    // unchanged, so the repeat was submitted again.
    assert_eq!(report.scrobbled, 0);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.errors, 2);
    assert_eq!(sink.submissions().len(), 2);
    assert_eq!(store.record_count(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn transport_errors_are_counted_and_processing_continues() {
    let sink = MockSink::new(SinkBehavior::Fail);
    let store = ScrobbleStore::open_in_memory().unwrap();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let items = vec![
        item("Song A", "Artist", "Today", "v1"),
        item("Song B", "Artist", "Today", "v2"),
    ];
    let report = scrobbler.process(&items).await;

    assert_eq!(report.scrobbled, 0);
    assert_eq!(report.errors, 2);
    assert_eq!(sink.submissions().len(), 2);
    assert_eq!(store.record_count(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn accepted_submissions_are_spaced_ninety_seconds_apart() {
    let sink = MockSink::new(SinkBehavior::Accept);
    let store = ScrobbleStore::open_in_memory().unwrap();
    let mut scrobbler = Scrobbler::new(&sink, &store, "sess");

    let before = Utc::now().timestamp();
    let items = vec![
        item("Song A", "Artist A", "Today", "v1"),
        item("Song B", "Artist B", "Today", "v2"),
        item("Song C", "Artist C", "Today", "v3"),
    ];
    scrobbler.process(&items).await;
    let after = Utc::now().timestamp();

    let subs = sink.submissions();
    assert_eq!(subs.len(), 3);
    for (i, sub) in subs.iter().enumerate() {
        let offset = BACKDATE_OFFSET_SECS + i as i64 * SCROBBLE_SPACING_SECS;
        assert!(sub.timestamp >= before - offset);
        assert!(sub.timestamp <= after - offset);
    }
    assert!(subs[0].timestamp > subs[1].timestamp);
    assert!(subs[1].timestamp > subs[2].timestamp);
}

#[test]
fn backdate_formula_is_exact() {
    let now = 1_700_000_000;
    assert_eq!(backdate(now, 0), now - 30);
    assert_eq!(backdate(now, 1), now - 30 - 90);
    assert_eq!(backdate(now, 4), now - 30 - 4 * 90);
}
