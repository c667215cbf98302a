#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Playlist unavailable ({playlist}): {reason}")]
    PlaylistUnavailable { playlist: String, reason: String },
    #[error("Completion call failed for video '{title}': {reason}")]
    CompletionCallFailed { title: String, reason: String },
    #[error("Missing configuration: {0}")]
    MissingConfiguration(&'static str),
    #[error("Cannot {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
    #[error("Render error: {0}")]
    Render(String),
}

impl Error {
    pub(crate) fn playlist_unavailable(playlist: impl Into<String>, reason: impl ToString) -> Self {
        Error::PlaylistUnavailable {
            playlist: playlist.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Render(e.to_string())
    }
}
