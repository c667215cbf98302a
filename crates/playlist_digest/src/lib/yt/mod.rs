pub mod playlist;
pub mod scraper;
pub mod transcript;

use std::{fmt, future::Future, time::Duration};

use chrono::NaiveDate;

use crate::{error::Error, record::PlaylistEntry};

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// HTTP client for the YouTube scrapers; `timeout` bounds every request.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(BROWSER_USER_AGENT)
        .build()
}

/// Enumerates the members of a playlist, in the order the provider lists them.
pub trait PlaylistScraper {
    const BASE_URL: &str;

    fn scrape_playlist(
        &self,
        playlist: &PlaylistRef,
    ) -> impl Future<Output = Result<Vec<PlaylistEntry>, Error>>;
}

/// Retrieves the transcript of a single video, along with what else its watch page reports.
pub trait TranscriptFetcher {
    fn fetch_transcript(
        &self,
        video_id: &str,
        title: &str,
    ) -> impl Future<Output = TranscriptResult>;
}

pub type TranscriptResult = Result<Transcript, TranscriptError>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub text: String,
    /// Read off the same page as the caption tracks; playlist pages only show relative dates.
    pub publish_date: Option<NaiveDate>,
}

/// Why a video's transcript could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranscriptError {
    #[error("Transcripts are disabled")]
    TranscriptsDisabled,
    #[error("No transcript found")]
    NoTranscriptFound,
    #[error("{0}")]
    Other(String),
}

/// A validated playlist id, parsed from either a bare id or a YouTube URL carrying `list=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRef {
    id: String,
}

impl PlaylistRef {
    pub fn parse(input: &str) -> Result<Self, Error> {
        let input = input.trim();
        if input.is_empty() {
            return Err(Error::MissingConfiguration("playlist URL or id"));
        }

        // Links are often copied without their scheme
        let url = url::Url::parse(input).ok().or_else(|| {
            (input.contains("list=") || input.contains('/'))
                .then(|| url::Url::parse(&format!("https://{input}")).ok())
                .flatten()
        });

        let id = match url {
            Some(url) => {
                let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
                if !(host == "youtu.be" || host == "youtube.com" || host.ends_with(".youtube.com"))
                {
                    return Err(Error::playlist_unavailable(input, "not a YouTube URL"));
                }
                url.query_pairs()
                    .find(|(key, _)| key == "list")
                    .map(|(_, value)| value.into_owned())
                    .ok_or_else(|| {
                        Error::playlist_unavailable(input, "URL has no 'list' parameter")
                    })?
            }
            None => input.to_string(),
        };

        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(Error::playlist_unavailable(input, "malformed playlist id"));
        }

        Ok(Self { id })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for PlaylistRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_ids_and_urls() {
        let expected = "PLbpi6ZahtOH6Blw3RGYpWkSByi_T7Rygb";
        for input in [
            "PLbpi6ZahtOH6Blw3RGYpWkSByi_T7Rygb",
            "https://www.youtube.com/playlist?list=PLbpi6ZahtOH6Blw3RGYpWkSByi_T7Rygb",
            "https://youtube.com/watch?v=dQw4w9WgXcQ&list=PLbpi6ZahtOH6Blw3RGYpWkSByi_T7Rygb&index=2",
            "  https://m.youtube.com/playlist?list=PLbpi6ZahtOH6Blw3RGYpWkSByi_T7Rygb  ",
            "www.youtube.com/playlist?list=PLbpi6ZahtOH6Blw3RGYpWkSByi_T7Rygb",
            "youtube.com/playlist?list=PLbpi6ZahtOH6Blw3RGYpWkSByi_T7Rygb",
        ] {
            let playlist = PlaylistRef::parse(input).expect(input);
            assert_eq!(playlist.id(), expected);
        }
    }

    #[test]
    fn rejects_invalid_references() {
        assert!(matches!(
            PlaylistRef::parse(""),
            Err(Error::MissingConfiguration(_))
        ));
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://vimeo.com/playlist?list=abc",
            "vimeo.com/playlist?list=abc",
            "www.youtube.com/watch?v=dQw4w9WgXcQ",
            "not a playlist",
        ] {
            assert!(
                matches!(
                    PlaylistRef::parse(input),
                    Err(Error::PlaylistUnavailable { .. })
                ),
                "{input} should be rejected"
            );
        }
    }
}
