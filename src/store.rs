//! Persistent duplicate-suppression store.
//!
//! A single SQLite table records every accepted submission as a
//! (track, artist, submitted-at, video-id) tuple. Before submitting, the
//! orchestrator asks the store whether the same track was already submitted
//! within a short lookback window; after an accepted submission it records
//! the tuple. Records older than the retention window are pruned on the
//! next initialization.
//!
//! Duplicate suppression is best-effort, not a correctness-critical ledger:
//! if the database cannot be opened the store degrades to a disabled state
//! where every check reports "no duplicate" and every write is a no-op, and
//! the run proceeds without persistent dedup rather than aborting.

use std::path::Path;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{Res, info, warning};

/// How long a prior submission of the same track counts as a duplicate.
pub const LOOKBACK_SECS: i64 = 2 * 3600;

/// How long records are retained before the initialization sweep deletes
/// them.
pub const RETENTION_SECS: i64 = 6 * 3600;

/// A persisted scrobble record, as stored in the `recent_scrobbles` table.
#[derive(Debug, Clone)]
pub struct ScrobbleRecord {
    pub track_name: String,
    pub artist_name: String,
    pub scrobbled_at: i64,
    pub video_id: String,
}

pub struct ScrobbleStore {
    conn: Option<Connection>,
}

impl ScrobbleStore {
    /// Opens (or creates) the store at `path`.
    ///
    /// Creates the schema if absent and deletes records older than the
    /// retention window. Any failure disables the store instead of failing
    /// the caller.
    pub fn open(path: &Path) -> ScrobbleStore {
        match Connection::open(path).and_then(|conn| {
            initialize(&conn, Utc::now().timestamp())?;
            Ok(conn)
        }) {
            Ok(conn) => ScrobbleStore { conn: Some(conn) },
            Err(e) => {
                warning!(
                    "Duplicate store unavailable ({}): continuing without persistent dedup",
                    e
                );
                ScrobbleStore { conn: None }
            }
        }
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Res<ScrobbleStore> {
        let conn = Connection::open_in_memory()?;
        initialize(&conn, Utc::now().timestamp())?;
        Ok(ScrobbleStore { conn: Some(conn) })
    }

    /// A store that is permanently disabled; checks report no duplicate and
    /// writes are no-ops.
    pub fn disabled() -> ScrobbleStore {
        ScrobbleStore { conn: None }
    }

    pub fn is_available(&self) -> bool {
        self.conn.is_some()
    }

    /// Looks for a submission of the same track within the lookback window
    /// ending at the current time. See [`ScrobbleStore::recent_duplicate_at`].
    pub fn recent_duplicate(
        &self,
        track_name: &str,
        artist_name: &str,
        video_id: &str,
    ) -> Option<ScrobbleRecord> {
        self.recent_duplicate_at(track_name, artist_name, video_id, Utc::now().timestamp())
    }

    /// Looks for a record matching either the (track, artist) pair
    /// case-insensitively, or the exact video id when one is given, with a
    /// submitted-at newer than `now` minus the lookback window. The most
    /// recent match is returned so the caller can report how long ago it
    /// was submitted.
    ///
    /// Storage errors are logged and treated as "no duplicate".
    pub fn recent_duplicate_at(
        &self,
        track_name: &str,
        artist_name: &str,
        video_id: &str,
        now: i64,
    ) -> Option<ScrobbleRecord> {
        let conn = self.conn.as_ref()?;
        let cutoff = now - LOOKBACK_SECS;

        let by_name = conn
            .query_row(
                r#"
                SELECT track_name, artist_name, scrobbled_at, video_id
                FROM recent_scrobbles
                WHERE track_name COLLATE NOCASE = ?1
                  AND artist_name COLLATE NOCASE = ?2
                  AND scrobbled_at > ?3
                ORDER BY scrobbled_at DESC
                LIMIT 1
                "#,
                params![track_name, artist_name, cutoff],
                row_to_record,
            )
            .optional();

        match by_name {
            Ok(Some(record)) => return Some(record),
            Ok(None) => {}
            Err(e) => {
                warning!("Duplicate check failed: {}", e);
                return None;
            }
        }

        if video_id.is_empty() {
            return None;
        }

        let by_video = conn
            .query_row(
                r#"
                SELECT track_name, artist_name, scrobbled_at, video_id
                FROM recent_scrobbles
                WHERE video_id = ?1 AND scrobbled_at > ?2
                ORDER BY scrobbled_at DESC
                LIMIT 1
                "#,
                params![video_id, cutoff],
                row_to_record,
            )
            .optional();

        match by_video {
            Ok(record) => record,
            Err(e) => {
                warning!("Duplicate check failed: {}", e);
                None
            }
        }
    }

    /// Records an accepted submission at the current time. See
    /// [`ScrobbleStore::record_at`].
    pub fn record(&self, track_name: &str, artist_name: &str, video_id: &str) {
        self.record_at(track_name, artist_name, video_id, Utc::now().timestamp());
    }

    /// Insert-if-absent on the (track, artist, submitted-at) identity;
    /// duplicates at the exact same second collapse. Storage errors are
    /// logged and swallowed.
    pub fn record_at(&self, track_name: &str, artist_name: &str, video_id: &str, now: i64) {
        let Some(conn) = self.conn.as_ref() else {
            return;
        };

        let result = conn.execute(
            r#"
            INSERT OR IGNORE INTO recent_scrobbles
            (track_name, artist_name, scrobbled_at, video_id)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![track_name, artist_name, now, video_id],
        );

        if let Err(e) = result {
            warning!("Failed to store scrobble record: {}", e);
        }
    }

    /// Number of records currently held, or `None` when the store is
    /// disabled.
    pub fn record_count(&self) -> Option<i64> {
        let conn = self.conn.as_ref()?;
        conn.query_row("SELECT COUNT(*) FROM recent_scrobbles", [], |row| row.get(0))
            .ok()
    }

    /// The most recent records, newest first.
    pub fn recent_records(&self, limit: usize) -> Res<Vec<ScrobbleRecord>> {
        let Some(conn) = self.conn.as_ref() else {
            return Ok(Vec::new());
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT track_name, artist_name, scrobbled_at, video_id
            FROM recent_scrobbles
            ORDER BY scrobbled_at DESC
            LIMIT ?1
            "#,
        )?;

        let records = stmt
            .query_map([limit as i64], row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScrobbleRecord> {
    Ok(ScrobbleRecord {
        track_name: row.get(0)?,
        artist_name: row.get(1)?,
        scrobbled_at: row.get(2)?,
        video_id: row.get(3)?,
    })
}

fn initialize(conn: &Connection, now: i64) -> rusqlite::Result<()> {
    let table_exists = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='recent_scrobbles'",
            [],
            |_| Ok(()),
        )
        .optional()?
        .is_some();

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS recent_scrobbles (
            track_name TEXT,
            artist_name TEXT,
            scrobbled_at INTEGER,
            video_id TEXT,
            PRIMARY KEY (track_name, artist_name, scrobbled_at)
        );
        "#,
    )?;

    if table_exists {
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM recent_scrobbles", [], |row| row.get(0))?;
        info!("Found {} existing records in duplicate store", count);
    }

    let deleted = conn.execute(
        "DELETE FROM recent_scrobbles WHERE scrobbled_at < ?1",
        params![now - RETENTION_SECS],
    )?;
    if deleted > 0 {
        info!("Cleaned {} records older than {}h", deleted, RETENTION_SECS / 3600);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn empty_store_reports_no_duplicate() {
        let store = ScrobbleStore::open_in_memory().unwrap();
        assert!(store.recent_duplicate_at("Song", "Artist", "v1", NOW).is_none());
    }

    #[test]
    fn duplicate_within_lookback_window() {
        let store = ScrobbleStore::open_in_memory().unwrap();
        store.record_at("Song", "Artist", "v1", NOW);

        let found = store
            .recent_duplicate_at("Song", "Artist", "v1", NOW + 60)
            .unwrap();
        assert_eq!(found.track_name, "Song");
        assert_eq!(found.scrobbled_at, NOW);
    }

    #[test]
    fn duplicate_expires_after_lookback_window() {
        let store = ScrobbleStore::open_in_memory().unwrap();
        store.record_at("Song", "Artist", "v1", NOW);

        assert!(
            store
                .recent_duplicate_at("Song", "Artist", "v1", NOW + LOOKBACK_SECS + 1)
                .is_none()
        );
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let store = ScrobbleStore::open_in_memory().unwrap();
        store.record_at("Song", "Artist", "", NOW);

        assert!(
            store
                .recent_duplicate_at("SONG", "artist", "", NOW + 1)
                .is_some()
        );
    }

    #[test]
    fn video_id_match_is_exact() {
        let store = ScrobbleStore::open_in_memory().unwrap();
        store.record_at("Song", "Artist", "abcDEF", NOW);

        // Different metadata, same source id: duplicate.
        assert!(
            store
                .recent_duplicate_at("Other Title", "Other Artist", "abcDEF", NOW + 1)
                .is_some()
        );
        // Case differs: not a match.
        assert!(
            store
                .recent_duplicate_at("Other Title", "Other Artist", "ABCdef", NOW + 1)
                .is_none()
        );
        // Empty source id never matches by id.
        assert!(
            store
                .recent_duplicate_at("Other Title", "Other Artist", "", NOW + 1)
                .is_none()
        );
    }

    #[test]
    fn most_recent_match_is_reported() {
        let store = ScrobbleStore::open_in_memory().unwrap();
        store.record_at("Song", "Artist", "v1", NOW - 600);
        store.record_at("Song", "Artist", "v1", NOW - 60);

        let found = store
            .recent_duplicate_at("Song", "Artist", "v1", NOW)
            .unwrap();
        assert_eq!(found.scrobbled_at, NOW - 60);
    }

    #[test]
    fn same_second_inserts_collapse() {
        let store = ScrobbleStore::open_in_memory().unwrap();
        store.record_at("Song", "Artist", "v1", NOW);
        store.record_at("Song", "Artist", "v2", NOW);

        assert_eq!(store.record_count(), Some(1));
    }

    #[test]
    fn initialization_prunes_expired_records() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn, NOW).unwrap();
        conn.execute(
            "INSERT INTO recent_scrobbles (track_name, artist_name, scrobbled_at, video_id)
             VALUES ('Old', 'Artist', ?1, ''), ('Fresh', 'Artist', ?2, '')",
            params![NOW - RETENTION_SECS - 1, NOW - 60],
        )
        .unwrap();

        initialize(&conn, NOW).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM recent_scrobbles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        let surviving: String = conn
            .query_row("SELECT track_name FROM recent_scrobbles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(surviving, "Fresh");
    }

    #[test]
    fn disabled_store_is_inert() {
        let store = ScrobbleStore::disabled();

        assert!(!store.is_available());
        store.record_at("Song", "Artist", "v1", NOW);
        assert!(store.recent_duplicate_at("Song", "Artist", "v1", NOW).is_none());
        assert_eq!(store.record_count(), None);
        assert!(store.recent_records(10).unwrap().is_empty());
    }
}
