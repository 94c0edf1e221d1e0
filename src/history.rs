//! History-source boundary.
//!
//! The scrobbler consumes an ordered sequence of play records from a
//! listening-history source. The source is a collaborator behind the
//! [`HistorySource`] trait; the shipped implementation reads a JSON export
//! of YouTube Music history items from a file. Items are immutable and only
//! relevant within one run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Res, error::SyncError};

/// One raw play record as the history source reports it. Field names mirror
/// the YouTube Music history export shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    /// Raw track title, possibly carrying a descriptive video suffix.
    #[serde(default)]
    pub title: String,
    /// Credited artists; only the first is used for scrobbling.
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    /// Album, when the source knows it.
    #[serde(default)]
    pub album: Option<AlbumRef>,
    /// Recency marker ("Today", "Yesterday", or an older bucket).
    #[serde(default)]
    pub played: Option<String>,
    /// Source identifier of the play.
    #[serde(rename = "videoId", default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

impl HistoryItem {
    pub fn primary_artist(&self) -> &str {
        self.artists.first().map(|a| a.name.as_str()).unwrap_or("")
    }

    pub fn album_name(&self) -> Option<&str> {
        self.album.as_ref().map(|a| a.name.as_str())
    }

    pub fn video_id(&self) -> &str {
        self.video_id.as_deref().unwrap_or("")
    }

    pub fn played(&self) -> &str {
        self.played.as_deref().unwrap_or("")
    }
}

/// A provider of recent listening history.
pub trait HistorySource {
    /// Returns the recent history, most recent first, as the source
    /// reports it. No pagination is handled here.
    async fn recent(&self) -> Res<Vec<HistoryItem>>;
}

/// History source backed by a JSON export file: a top-level array of
/// history items.
pub struct FileHistorySource {
    path: PathBuf,
}

impl FileHistorySource {
    pub fn new(path: PathBuf) -> FileHistorySource {
        FileHistorySource { path }
    }
}

impl HistorySource for FileHistorySource {
    async fn recent(&self) -> Res<Vec<HistoryItem>> {
        let json = async_fs::read_to_string(&self.path).await.map_err(|e| {
            SyncError::Config(format!(
                "cannot read history file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&json).map_err(|e| {
            SyncError::ResponseParse(format!(
                "malformed history file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}
