use crate::{
    parser::{parse_publish_date, select_caption_track, timed_text_to_transcript},
    types::{PlayerResponse, TimedText},
    yt::{
        scraper::Scraper, Transcript, TranscriptError, TranscriptFetcher, TranscriptResult,
        YOUTUBE_BASE_URL,
    },
};

/// Fetches captions through the watch page's caption tracks. One watch page request per video.
pub struct TranscriptClient {
    scraper: Scraper,
    languages: Vec<String>,
}

impl TranscriptClient {
    pub fn new(scraper: Scraper) -> Self {
        Self {
            scraper,
            languages: vec!["en".into()],
        }
    }

    /// Caption languages to try, most preferred first.
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }

    async fn try_fetch(&self, video_id: &str) -> TranscriptResult {
        let url = format!("{YOUTUBE_BASE_URL}/watch?v={video_id}");
        let doc = self.scraper.fetch_page(&url).await?;
        let player = doc
            .player_response::<PlayerResponse>()
            .map_err(|e| TranscriptError::Other(e.to_string()))?;

        let track = select_caption_track(&player, &self.languages)?;
        tracing::debug!(
            language = %track.language_code,
            generated = track.is_generated(),
            "Selected caption track"
        );

        let timed_text = self
            .scraper
            .get(timed_text_url(&track.base_url)?)
            .send()
            .await?
            .error_for_status()?
            .json::<TimedText>()
            .await?;

        let text = timed_text_to_transcript(&timed_text);
        if text.is_empty() {
            return Err(TranscriptError::NoTranscriptFound);
        }

        Ok(Transcript {
            text,
            publish_date: parse_publish_date(&player),
        })
    }
}

impl TranscriptFetcher for TranscriptClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(&self, video_id: &str, title: &str) -> TranscriptResult {
        self.try_fetch(video_id)
            .await
            .inspect_err(|e| tracing::debug!(reason = %e, "Transcript fetch failed"))
    }
}

impl From<reqwest::Error> for TranscriptError {
    fn from(e: reqwest::Error) -> Self {
        TranscriptError::Other(e.to_string())
    }
}

/// Rewrites a caption track url to request the `json3` format.
fn timed_text_url(base_url: &str) -> Result<String, TranscriptError> {
    let mut url = url::Url::parse(base_url)
        .map_err(|e| TranscriptError::Other(format!("Invalid caption track url: {e}")))?;

    let pairs = url
        .query_pairs()
        .filter(|(key, _)| key != "fmt")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect::<Vec<_>>();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url.into())
}
