use std::fmt;

/// Error taxonomy for the synchronization pipeline.
///
/// Every fallible operation reports which kind of failure occurred so call
/// sites can decide whether to abort the run (configuration and
/// authorization failures), degrade (storage failures disable the duplicate
/// store), or count-and-continue (per-item scrobble failures).
#[derive(Debug)]
pub enum SyncError {
    /// A required credential or setting is missing at startup. Fatal,
    /// reported before any network activity.
    Config(String),
    /// A remote call failed: non-2xx status, timeout, or connection error.
    /// Fatal for the authorization exchange, per-item-recoverable for a
    /// scrobble submission.
    RemoteRequest(String),
    /// The persistent duplicate store failed. Never fatal to a run; the
    /// store degrades to a disabled state instead.
    Storage(rusqlite::Error),
    /// The remote service returned markup we could not interpret.
    ResponseParse(String),
    /// Local file I/O failed (history file, `.env` write-back).
    Io(std::io::Error),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Config(msg) => write!(f, "configuration error: {}", msg),
            SyncError::RemoteRequest(msg) => write!(f, "remote request failed: {}", msg),
            SyncError::Storage(err) => write!(f, "storage error: {}", err),
            SyncError::ResponseParse(msg) => write!(f, "unparseable response: {}", msg),
            SyncError::Io(err) => write!(f, "i/o error: {}", err),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::RemoteRequest(err.to_string())
    }
}

impl From<rusqlite::Error> for SyncError {
    fn from(err: rusqlite::Error) -> Self {
        SyncError::Storage(err)
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Io(err)
    }
}

impl From<quick_xml::Error> for SyncError {
    fn from(err: quick_xml::Error) -> Self {
        SyncError::ResponseParse(err.to_string())
    }
}
