//! Error types shared by the recorder, the highscore file and the remote table.
//!
//! None of these are fatal. Callers decide whether to log, notify or ignore.

use std::path::PathBuf;

/// The host tried to time or record something without a complete selection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no puzzle selected")]
    MissingPuzzle,

    #[error("unknown puzzle: {0}")]
    UnknownPuzzle(String),

    #[error("no player selected")]
    MissingPlayer,
}

/// Reading or writing the local highscore file failed.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("highscore file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("highscore file {path} is not valid JSON: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The remote table could not be reached or returned something unusable.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Connection, timeout or non-success HTTP status.
    #[error("remote table unavailable: {0}")]
    Transport(String),

    /// The body could not be decoded into rows.
    #[error("remote table returned malformed data: {0}")]
    Malformed(String),

    /// Rows exist but a required column is missing from all of them.
    #[error("remote table is missing required column {0}")]
    Schema(&'static str),

    #[error("no remote table configured")]
    Unconfigured,
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RemoteError::Malformed(err.to_string())
        } else {
            RemoteError::Transport(err.to_string())
        }
    }
}
