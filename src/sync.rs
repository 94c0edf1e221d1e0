//! The synchronization orchestrator.
//!
//! Drives the per-run pipeline: filter the fetched history down to recent
//! plays, normalize the metadata, suppress duplicates against both the
//! persistent store and a session-local seen set, submit each remaining
//! item as a backdated scrobble, and pace the outbound requests.
//!
//! Scrobbles are strictly sequential within a run: the backdating formula
//! depends on how many submissions have been accepted so far, so successive
//! accepted submissions appear ~90 seconds apart to the remote service,
//! oldest-looking first.

use std::collections::HashSet;
use std::time::Duration;

use chrono::Utc;

use crate::{
    Res,
    history::HistoryItem,
    info,
    lastfm::{LastfmClient, response},
    normalize::{TOPIC_SUFFIX, normalize_track, seen_key},
    store::ScrobbleStore,
    success, warning,
};

/// Spacing between successive accepted submissions, as perceived by the
/// remote service.
pub const SCROBBLE_SPACING_SECS: i64 = 90;

/// Every submission is dated at least this far in the past.
pub const BACKDATE_OFFSET_SECS: i64 = 30;

/// Pause between outbound submissions to bound the request rate.
pub const PACING_DELAY: Duration = Duration::from_millis(500);

/// Submission timestamp for the next scrobble given how many have been
/// accepted this run: now − 30s − (accepted × 90s).
pub fn backdate(now: i64, accepted_count: i64) -> i64 {
    now - BACKDATE_OFFSET_SECS - accepted_count * SCROBBLE_SPACING_SECS
}

/// Destination for scrobble submissions. The production implementation is
/// [`LastfmClient`]; tests substitute their own.
pub trait ScrobbleSink {
    /// Submits one play and reports whether the service accepted it.
    async fn submit(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: &str,
        session_key: &str,
        timestamp: i64,
    ) -> Res<bool>;
}

impl ScrobbleSink for LastfmClient {
    async fn submit(
        &self,
        track_name: &str,
        artist_name: &str,
        album_name: &str,
        session_key: &str,
        timestamp: i64,
    ) -> Res<bool> {
        let xml = self
            .scrobble(track_name, artist_name, album_name, session_key, Some(timestamp))
            .await?;
        response::scrobble_accepted(&xml)
    }
}

/// Outcome counts of one run, reported in the final summary line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub scrobbled: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// One run of the synchronization pipeline.
///
/// Holds the session-local seen set of already-submitted normalized keys.
/// The set exists because the persistent store's write may lag a same-run
/// re-fetch, and because a track appearing twice in one history pull must
/// not be double-submitted even before a persisted record exists.
pub struct Scrobbler<'a, C> {
    client: &'a C,
    store: &'a ScrobbleStore,
    session_key: &'a str,
    seen: HashSet<(String, String)>,
}

impl<'a, C: ScrobbleSink> Scrobbler<'a, C> {
    pub fn new(client: &'a C, store: &'a ScrobbleStore, session_key: &'a str) -> Scrobbler<'a, C> {
        Scrobbler {
            client,
            store,
            session_key,
            seen: HashSet::new(),
        }
    }

    /// Processes the history items in order. Per-item failures are counted
    /// and logged; the loop continues regardless of any single outcome.
    pub async fn process(&mut self, items: &[HistoryItem]) -> SyncReport {
        let mut report = SyncReport::default();

        for item in items {
            let submitted = self.process_item(item, &mut report).await;
            if submitted {
                tokio::time::sleep(PACING_DELAY).await;
            }
        }

        report
    }

    /// Returns true when a submission was attempted (accepted or not), so
    /// the caller knows to apply the pacing delay.
    async fn process_item(&mut self, item: &HistoryItem, report: &mut SyncReport) -> bool {
        // Only plays within the recency window are eligible; older buckets
        // are skipped silently and not counted.
        if !matches!(item.played(), "Today" | "Yesterday") {
            return false;
        }

        // Auto-generated Topic channels are dropped entirely, before
        // normalization and without counting as a duplicate.
        let raw_artist = item.primary_artist();
        if raw_artist.ends_with(TOPIC_SUFFIX) {
            return false;
        }

        let (track_name, artist_name) = normalize_track(&item.title, raw_artist);
        let album_name = item.album_name().unwrap_or(&track_name).to_string();
        let video_id = item.video_id();

        if let Some(prior) = self.store.recent_duplicate(&track_name, &artist_name, video_id) {
            let seconds_ago = Utc::now().timestamp() - prior.scrobbled_at;
            info!(
                "Duplicate found: '{}' by '{}' (scrobbled {}s ago)",
                prior.track_name, prior.artist_name, seconds_ago
            );
            report.skipped += 1;
            return false;
        }

        let key = seen_key(&track_name, &artist_name);
        if self.seen.contains(&key) {
            info!("Duplicate in current session: {} by {}", track_name, artist_name);
            report.skipped += 1;
            return false;
        }

        let timestamp = backdate(Utc::now().timestamp(), report.scrobbled as i64);
        match self
            .client
            .submit(&track_name, &artist_name, &album_name, self.session_key, timestamp)
            .await
        {
            Ok(true) => {
                report.scrobbled += 1;
                self.seen.insert(key);
                self.store.record(&track_name, &artist_name, video_id);
                success!("Scrobbled: {} by {}", track_name, artist_name);
            }
            Ok(false) => {
                report.errors += 1;
                warning!("Not accepted: {} by {}", track_name, artist_name);
            }
            Err(e) => {
                report.errors += 1;
                warning!("Failed: {} - {}", track_name, e);
            }
        }

        true
    }
}
