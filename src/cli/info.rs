use chrono::{Local, TimeZone};
use tabled::{Table, Tabled};

use crate::{config::Config, info, store::ScrobbleStore, warning};

#[derive(Tabled)]
struct RecordTableRow {
    scrobbled: String,
    track: String,
    artist: String,
    video_id: String,
}

/// Shows the state of the duplicate store: how many records it currently
/// holds and the most recent ones as a table.
pub async fn info(config: &Config, records: usize) {
    let store = ScrobbleStore::open(&config.db_path);
    if !store.is_available() {
        warning!("Duplicate store is unavailable.");
        return;
    }

    if let Some(count) = store.record_count() {
        info!("Duplicate store contains {} records", count);
    }

    let recent = match store.recent_records(records) {
        Ok(recent) => recent,
        Err(e) => {
            warning!("Failed to read records: {}", e);
            return;
        }
    };

    if recent.is_empty() {
        info!("No records within the retention window.");
        return;
    }

    let rows: Vec<RecordTableRow> = recent
        .into_iter()
        .map(|r| RecordTableRow {
            scrobbled: Local
                .timestamp_opt(r.scrobbled_at, 0)
                .single()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| r.scrobbled_at.to_string()),
            track: r.track_name,
            artist: r.artist_name,
            video_id: r.video_id,
        })
        .collect();

    println!("{}", Table::new(rows));
}
